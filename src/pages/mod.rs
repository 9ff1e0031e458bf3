mod home;
mod important;
mod layout;
mod login;
mod repository;
mod search;

pub use home::HomePage;
pub use important::ImportantDatesPage;
pub use layout::{GuestOnly, NotFound, RequireAuth};
pub use login::LoginPage;
pub use repository::RepositoryPage;
pub use search::SearchPage;
