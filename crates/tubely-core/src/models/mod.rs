pub mod video;

pub use video::{VideoLocation, VideoRecord, VideoResponse};
