// Application runs: multipart intake, one pipeline run per request, persistence
// of inputs and outputs per user.

pub mod form;
pub mod handlers;
pub mod intake;
pub mod repository;
