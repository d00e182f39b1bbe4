// Services module
// Pipeline building blocks: API clients, storage, catalog and playback

pub mod catalog;
pub mod narrative;
pub mod playback;
pub mod speech;
pub mod storage;
