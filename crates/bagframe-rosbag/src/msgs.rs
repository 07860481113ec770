//! Typed ROS1 messages that can appear in a converted recording.
//!
//! Only the message types listed in [MessageType] are decoded. Every one
//! of them starts with a `std_msgs/Header`, which carries the timestamp
//! used for alignment.

use crate::decode::{Decode, Reader};
use bagframe_core::{FieldWriter, Flatten};
use eyre::{Result, WrapErr, bail};

/// `std_msgs/Header`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Header {
    pub seq: u32,
    pub stamp: Time,
    pub frame_id: String,
}

/// ROS1 `time`: unsigned seconds and nanoseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Time {
    pub secs: u32,
    pub nsecs: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pose {
    pub position: Vector3,
    pub orientation: Quaternion,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Twist {
    pub linear: Vector3,
    pub angular: Vector3,
}

/// `sensor_msgs/CompressedImage`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompressedImage {
    pub header: Header,
    pub format: String,
    pub data: Vec<u8>,
}

/// `sensor_msgs/Imu`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Imu {
    pub header: Header,
    pub orientation: Quaternion,
    pub orientation_covariance: [f64; 9],
    pub angular_velocity: Vector3,
    pub angular_velocity_covariance: [f64; 9],
    pub linear_acceleration: Vector3,
    pub linear_acceleration_covariance: [f64; 9],
}

/// `sensor_msgs/NavSatFix`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavSatFix {
    pub header: Header,
    pub status: i8,
    pub service: u16,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub position_covariance: [f64; 9],
    pub position_covariance_type: u8,
}

/// `sensor_msgs/CameraInfo`, header only.
///
/// Calibration topics are dropped before alignment so the remaining
/// fields are never read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CameraInfo {
    pub header: Header,
}

/// `geometry_msgs/PoseStamped`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoseStamped {
    pub header: Header,
    pub pose: Pose,
}

/// `geometry_msgs/TwistStamped`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TwistStamped {
    pub header: Header,
    pub twist: Twist,
}

/// `nav_msgs/Odometry`.
#[derive(Debug, Clone, PartialEq)]
pub struct Odometry {
    pub header: Header,
    pub child_frame_id: String,
    pub pose: Pose,
    pub pose_covariance: [f64; 36],
    pub twist: Twist,
    pub twist_covariance: [f64; 36],
}

impl Default for Odometry {
    fn default() -> Self {
        Self {
            header: Header::default(),
            child_frame_id: String::new(),
            pose: Pose::default(),
            pose_covariance: [0.0; 36],
            twist: Twist::default(),
            twist_covariance: [0.0; 36],
        }
    }
}

/// The message types this crate can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    CompressedImage,
    Imu,
    NavSatFix,
    CameraInfo,
    PoseStamped,
    TwistStamped,
    Odometry,
}

impl MessageType {
    pub const ALL: [MessageType; 7] = [
        MessageType::CompressedImage,
        MessageType::Imu,
        MessageType::NavSatFix,
        MessageType::CameraInfo,
        MessageType::PoseStamped,
        MessageType::TwistStamped,
        MessageType::Odometry,
    ];

    /// Resolves a ROS type name.
    ///
    /// Both `sensor_msgs/Imu` and `sensor_msgs/msg/Imu` are accepted.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = normalize_msg_type(name);
        Self::ALL.into_iter().find(|ty| ty.name() == name)
    }

    /// The ROS1 type name.
    pub fn name(self) -> &'static str {
        match self {
            MessageType::CompressedImage => "sensor_msgs/CompressedImage",
            MessageType::Imu => "sensor_msgs/Imu",
            MessageType::NavSatFix => "sensor_msgs/NavSatFix",
            MessageType::CameraInfo => "sensor_msgs/CameraInfo",
            MessageType::PoseStamped => "geometry_msgs/PoseStamped",
            MessageType::TwistStamped => "geometry_msgs/TwistStamped",
            MessageType::Odometry => "nav_msgs/Odometry",
        }
    }
}

/// Strips the ROS2 style `/msg/` segment from a type name.
fn normalize_msg_type(msg_type: &str) -> String {
    match msg_type.split_once("/msg/") {
        Some((package, type_name)) => format!("{package}/{type_name}"),
        None => msg_type.to_string(),
    }
}

/// A decoded message of one of the supported types.
#[derive(Debug, Clone, PartialEq)]
pub enum RosMessage {
    CompressedImage(CompressedImage),
    Imu(Imu),
    NavSatFix(NavSatFix),
    CameraInfo(CameraInfo),
    PoseStamped(PoseStamped),
    TwistStamped(TwistStamped),
    Odometry(Odometry),
}

impl RosMessage {
    /// Decodes a serialized payload of the given type.
    pub fn decode(msg_type: MessageType, bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(bytes);
        let message = match msg_type {
            MessageType::CompressedImage => RosMessage::CompressedImage(reader.decode()?),
            MessageType::Imu => RosMessage::Imu(reader.decode()?),
            MessageType::NavSatFix => RosMessage::NavSatFix(reader.decode()?),
            MessageType::CameraInfo => RosMessage::CameraInfo(reader.decode()?),
            MessageType::PoseStamped => RosMessage::PoseStamped(reader.decode()?),
            MessageType::TwistStamped => RosMessage::TwistStamped(reader.decode()?),
            MessageType::Odometry => RosMessage::Odometry(reader.decode()?),
        };

        // CameraInfo is read partially on purpose.
        if msg_type != MessageType::CameraInfo && reader.remaining() > 0 {
            bail!(
                "{} left {} trailing bytes",
                msg_type.name(),
                reader.remaining()
            );
        }
        Ok(message)
    }

    pub fn header(&self) -> &Header {
        match self {
            RosMessage::CompressedImage(msg) => &msg.header,
            RosMessage::Imu(msg) => &msg.header,
            RosMessage::NavSatFix(msg) => &msg.header,
            RosMessage::CameraInfo(msg) => &msg.header,
            RosMessage::PoseStamped(msg) => &msg.header,
            RosMessage::TwistStamped(msg) => &msg.header,
            RosMessage::Odometry(msg) => &msg.header,
        }
    }
}

// Decoding

impl Decode for Time {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            secs: reader.u32()?,
            nsecs: reader.u32()?,
        })
    }
}

impl Decode for Header {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            seq: reader.u32()?,
            stamp: reader.decode()?,
            frame_id: reader.string()?,
        })
    }
}

impl Decode for Vector3 {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            x: reader.f64()?,
            y: reader.f64()?,
            z: reader.f64()?,
        })
    }
}

impl Decode for Quaternion {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            x: reader.f64()?,
            y: reader.f64()?,
            z: reader.f64()?,
            w: reader.f64()?,
        })
    }
}

impl Decode for Pose {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            position: reader.decode()?,
            orientation: reader.decode()?,
        })
    }
}

impl Decode for Twist {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            linear: reader.decode()?,
            angular: reader.decode()?,
        })
    }
}

impl Decode for CompressedImage {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            header: reader.decode().wrap_err("invalid header")?,
            format: reader.string()?,
            data: reader.byte_array()?,
        })
    }
}

impl Decode for Imu {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            header: reader.decode().wrap_err("invalid header")?,
            orientation: reader.decode()?,
            orientation_covariance: reader.f64_array()?,
            angular_velocity: reader.decode()?,
            angular_velocity_covariance: reader.f64_array()?,
            linear_acceleration: reader.decode()?,
            linear_acceleration_covariance: reader.f64_array()?,
        })
    }
}

impl Decode for NavSatFix {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            header: reader.decode().wrap_err("invalid header")?,
            status: reader.i8()?,
            service: reader.u16()?,
            latitude: reader.f64()?,
            longitude: reader.f64()?,
            altitude: reader.f64()?,
            position_covariance: reader.f64_array()?,
            position_covariance_type: reader.u8()?,
        })
    }
}

impl Decode for CameraInfo {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            header: reader.decode().wrap_err("invalid header")?,
        })
    }
}

impl Decode for PoseStamped {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            header: reader.decode().wrap_err("invalid header")?,
            pose: reader.decode()?,
        })
    }
}

impl Decode for TwistStamped {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            header: reader.decode().wrap_err("invalid header")?,
            twist: reader.decode()?,
        })
    }
}

impl Decode for Odometry {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            header: reader.decode().wrap_err("invalid header")?,
            child_frame_id: reader.string()?,
            pose: reader.decode()?,
            pose_covariance: reader.f64_array()?,
            twist: reader.decode()?,
            twist_covariance: reader.f64_array()?,
        })
    }
}

// Flattening

impl Flatten for Header {
    fn flatten_into(&self, out: &mut FieldWriter<'_>) {
        out.int("seq", self.seq)
            .scope("stamp", |out| {
                out.int("secs", self.stamp.secs).int("nsecs", self.stamp.nsecs);
            })
            .text("frame_id", &self.frame_id);
    }
}

impl Flatten for Vector3 {
    fn flatten_into(&self, out: &mut FieldWriter<'_>) {
        out.float("x", self.x).float("y", self.y).float("z", self.z);
    }
}

impl Flatten for Quaternion {
    fn flatten_into(&self, out: &mut FieldWriter<'_>) {
        out.float("x", self.x)
            .float("y", self.y)
            .float("z", self.z)
            .float("w", self.w);
    }
}

impl Flatten for Pose {
    fn flatten_into(&self, out: &mut FieldWriter<'_>) {
        out.nested("position", &self.position)
            .nested("orientation", &self.orientation);
    }
}

impl Flatten for Twist {
    fn flatten_into(&self, out: &mut FieldWriter<'_>) {
        out.nested("linear", &self.linear)
            .nested("angular", &self.angular);
    }
}

impl Flatten for CompressedImage {
    fn flatten_into(&self, out: &mut FieldWriter<'_>) {
        out.nested("header", &self.header)
            .text("format", &self.format)
            .bytes("data", &self.data);
    }
}

impl Flatten for Imu {
    fn flatten_into(&self, out: &mut FieldWriter<'_>) {
        out.nested("header", &self.header)
            .nested("orientation", &self.orientation)
            .floats("orientation_covariance", &self.orientation_covariance)
            .nested("angular_velocity", &self.angular_velocity)
            .floats(
                "angular_velocity_covariance",
                &self.angular_velocity_covariance,
            )
            .nested("linear_acceleration", &self.linear_acceleration)
            .floats(
                "linear_acceleration_covariance",
                &self.linear_acceleration_covariance,
            );
    }
}

impl Flatten for NavSatFix {
    fn flatten_into(&self, out: &mut FieldWriter<'_>) {
        out.nested("header", &self.header)
            .scope("status", |out| {
                out.int("status", self.status).int("service", self.service);
            })
            .float("latitude", self.latitude)
            .float("longitude", self.longitude)
            .float("altitude", self.altitude)
            .floats("position_covariance", &self.position_covariance)
            .int("position_covariance_type", self.position_covariance_type);
    }
}

impl Flatten for CameraInfo {
    fn flatten_into(&self, out: &mut FieldWriter<'_>) {
        out.nested("header", &self.header);
    }
}

impl Flatten for PoseStamped {
    fn flatten_into(&self, out: &mut FieldWriter<'_>) {
        out.nested("header", &self.header)
            .nested("pose", &self.pose);
    }
}

impl Flatten for TwistStamped {
    fn flatten_into(&self, out: &mut FieldWriter<'_>) {
        out.nested("header", &self.header)
            .nested("twist", &self.twist);
    }
}

impl Flatten for Odometry {
    fn flatten_into(&self, out: &mut FieldWriter<'_>) {
        out.nested("header", &self.header)
            .text("child_frame_id", &self.child_frame_id)
            .scope("pose", |out| {
                out.nested("pose", &self.pose)
                    .floats("covariance", &self.pose_covariance);
            })
            .scope("twist", |out| {
                out.nested("twist", &self.twist)
                    .floats("covariance", &self.twist_covariance);
            });
    }
}

impl Flatten for RosMessage {
    fn flatten_into(&self, out: &mut FieldWriter<'_>) {
        match self {
            RosMessage::CompressedImage(msg) => msg.flatten_into(out),
            RosMessage::Imu(msg) => msg.flatten_into(out),
            RosMessage::NavSatFix(msg) => msg.flatten_into(out),
            RosMessage::CameraInfo(msg) => msg.flatten_into(out),
            RosMessage::PoseStamped(msg) => msg.flatten_into(out),
            RosMessage::TwistStamped(msg) => msg.flatten_into(out),
            RosMessage::Odometry(msg) => msg.flatten_into(out),
        }
    }
}
