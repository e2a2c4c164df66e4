pub mod question;
pub mod response;
pub mod upload;

pub use question::{ParsedQuestion, Solution};
pub use response::{ErrorBody, SolveResponse};
pub use upload::ImageUpload;
