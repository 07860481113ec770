//! ROS1 bag files as a [RecordSource](bagframe_core::RecordSource).
//!
//! [RosbagSource] reads the chunked bag container with the `rosbag`
//! crate and decodes message payloads into the typed messages in
//! [msgs]. The decoded messages implement
//! [Flatten](bagframe_core::Flatten), so they can be fed straight into
//! [convert](bagframe_core::convert).
//!
//! ```ignore
//! use bagframe_core::{Config, convert};
//! use bagframe_rosbag::RosbagSource;
//!
//! let mut source = RosbagSource::open("drive.bag")?;
//! let summary = convert(&mut source, &Config::new("drive"))?;
//! println!("{} rows", summary.rows);
//! ```
//!
//! # Message Type Support
//!
//! - `sensor_msgs/{CompressedImage, Imu, NavSatFix, CameraInfo}`
//! - `geometry_msgs/{PoseStamped, TwistStamped}`
//! - `nav_msgs/Odometry`
//!
//! Selecting a topic of any other type is an error.

mod bag;
pub mod decode;
pub mod msgs;

pub use bag::RosbagSource;
pub use msgs::{MessageType, RosMessage};

// Re-export bagframe-core for convenience
pub use bagframe_core;
