mod file;
mod http;

pub use file::FileSink;
pub use http::HttpSink;
