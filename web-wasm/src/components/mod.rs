pub mod header;
pub mod progress_bar;
pub mod result_list;
pub mod result_view;
pub mod upload_area;
