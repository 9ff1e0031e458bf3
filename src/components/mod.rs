pub mod category_tabs;
pub mod composer_box;
pub mod entry_list;
pub mod glyphs;
pub mod ui;

pub use category_tabs::{CategoryTabs, TypeChips};
pub use composer_box::ComposerBox;
pub use entry_list::EntryList;
