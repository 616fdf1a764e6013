pub mod form;
pub mod popups;
pub mod search;
pub mod status;
pub mod table;

pub use form::render_form;
pub use popups::{centered_rect, render_help_popup, render_label_picker, truncate_string};
pub use search::render_picker_query;
pub use status::{render_notice, render_title_bar};
pub use table::render_label_table;
