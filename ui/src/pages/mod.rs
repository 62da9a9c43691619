pub mod document_detail;
pub mod documents;
pub mod home;
pub mod not_found;

pub use document_detail::DocumentDetailPage;
pub use documents::DocumentsPage;
pub use home::HomePage;
pub use not_found::NotFoundPage;
