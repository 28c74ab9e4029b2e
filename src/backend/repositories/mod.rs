pub mod detections;
pub mod predictions;
pub mod realtime_detections;
