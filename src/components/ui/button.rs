use leptos::prelude::*;
use leptos_ui::variants;

variants! {
    Button {
        base: "inline-flex items-center justify-center gap-2 whitespace-nowrap rounded-md text-sm font-medium transition-all disabled:pointer-events-none disabled:opacity-50 [&_svg]:pointer-events-none [&_svg:not([class*='size-'])]:size-4 shrink-0 [&_svg]:shrink-0 outline-none focus-visible:ring-stone-400/50 focus-visible:ring-[3px] hover:cursor-pointer active:scale-[0.98] touch-manipulation [-webkit-tap-highlight-color:transparent] select-none",
        variants: {
            variant: {
                Default: "bg-stone-900 text-white shadow-xs hover:bg-stone-800 dark:bg-stone-100 dark:text-stone-900 dark:hover:bg-stone-200",
                Destructive: "text-stone-400 hover:text-red-500 dark:text-stone-500 dark:hover:text-red-400",
                Outline: "border border-stone-200 bg-transparent hover:bg-stone-100 dark:border-stone-700 dark:hover:bg-stone-800",
                Ghost: "text-stone-500 hover:bg-stone-100 hover:text-stone-900 dark:text-stone-400 dark:hover:bg-stone-800 dark:hover:text-stone-100",
                Link: "text-stone-800 underline-offset-4 hover:underline dark:text-stone-200",
                Listening: "bg-red-500 text-white animate-pulse shadow-md",
            },
            size: {
                Default: "h-9 px-4 py-2 has-[>svg]:px-3",
                Sm: "h-8 gap-1.5 px-3 has-[>svg]:px-2.5",
                Icon: "size-9",
                Round: "h-[52px] w-[52px] rounded-full",
            }
        },
        component: {
            element: button,
            support_href: true,
            support_aria_current: true
        }
    }
}

variants! {
    Chip {
        base: "inline-flex items-center gap-1.5 rounded-full border px-3 py-1 text-xs font-medium transition-colors hover:cursor-pointer select-none",
        variants: {
            variant: {
                Default: "border-stone-200 text-stone-500 hover:border-stone-400 dark:border-stone-700 dark:text-stone-400",
                Active: "border-stone-900 bg-stone-900 text-white dark:border-stone-100 dark:bg-stone-100 dark:text-stone-900",
            },
            size: {
                Default: "",
                Tab: "rounded-none border-0 border-b-2 px-1 pb-3 pt-0 text-sm",
            }
        },
        component: {
            element: button,
            support_href: true,
            support_aria_current: true
        }
    }
}
