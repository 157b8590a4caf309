pub mod header;
pub mod result_panel;
pub mod upload_form;
