pub mod confirmation_modal;
pub mod document_selection_modal;
pub mod error_panel;
pub mod header;
pub mod markdown_text;
pub mod modal;
pub mod pagination_controls;
pub mod progress_bar;
pub mod summary_modal;
pub mod toast;
pub mod upload_panel;

pub use confirmation_modal::ConfirmationModal;
pub use document_selection_modal::DocumentSelectionModal;
pub use error_panel::ErrorPanel;
pub use header::Header;
pub use markdown_text::MarkdownText;
pub use modal::Modal;
pub use pagination_controls::PaginationControls;
pub use progress_bar::ProgressBar;
pub use summary_modal::SummaryModal;
pub use toast::ToastContainer;
pub use upload_panel::UploadPanel;
