pub mod developer_form;
pub mod json;
pub mod path;

pub use developer_form::DeveloperForm;
pub use json::ApiJson;
pub use path::ApiPath;
