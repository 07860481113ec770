use bagframe_rosbag::MessageType;
use byteorder::{LittleEndian, WriteBytesExt};
use image::{ImageBuffer, ImageFormat, Rgb};
use std::{fs, io::Cursor, path::Path};

pub const REFERENCE_TOPIC: &str = "/zed2/zed_node/left/image_rect_color/compressed";
#[allow(dead_code)]
pub const REFERENCE_KEY: &str = "/zed2/zed_node/left/image_rect_color/compressed/data";
pub const REFERENCE_COLUMN: &str = "zed2";

/// Serializes ROS1 message payloads.
#[derive(Default)]
pub struct Encoder {
    bytes: Vec<u8>,
}

#[allow(dead_code)]
impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn u8(mut self, value: u8) -> Self {
        self.bytes.push(value);
        self
    }

    pub fn i8(mut self, value: i8) -> Self {
        self.bytes.write_i8(value).unwrap();
        self
    }

    pub fn u16(mut self, value: u16) -> Self {
        self.bytes.write_u16::<LittleEndian>(value).unwrap();
        self
    }

    pub fn u32(mut self, value: u32) -> Self {
        self.bytes.write_u32::<LittleEndian>(value).unwrap();
        self
    }

    pub fn f64(mut self, value: f64) -> Self {
        self.bytes.write_f64::<LittleEndian>(value).unwrap();
        self
    }

    pub fn f64s(mut self, values: &[f64]) -> Self {
        for &value in values {
            self = self.f64(value);
        }
        self
    }

    pub fn string(self, value: &str) -> Self {
        self.byte_array(value.as_bytes())
    }

    pub fn byte_array(mut self, value: &[u8]) -> Self {
        self = self.u32(value.len() as u32);
        self.bytes.extend_from_slice(value);
        self
    }

    pub fn header(self, seq: u32, secs: u32, nsecs: u32) -> Self {
        self.u32(seq).u32(secs).u32(nsecs).string("base_link")
    }

    pub fn finish(self) -> Vec<u8> {
        self.bytes
    }
}

/// Encodes a tiny solid-color PNG.
pub fn encoded_frame(shade: u8) -> Vec<u8> {
    let frame: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_pixel(2, 2, Rgb([shade, shade, 0]));
    let mut bytes = Cursor::new(Vec::new());
    frame.write_to(&mut bytes, ImageFormat::Png).unwrap();
    bytes.into_inner()
}

pub fn compressed_image(secs: u32, nsecs: u32, data: &[u8]) -> Vec<u8> {
    Encoder::new()
        .header(secs, secs, nsecs)
        .string("png")
        .byte_array(data)
        .finish()
}

/// An Imu message whose fields are all zero except the forward
/// acceleration.
pub fn imu(secs: u32, nsecs: u32, accel_x: f64) -> Vec<u8> {
    Encoder::new()
        .header(secs, secs, nsecs)
        .f64s(&[0.0, 0.0, 0.0, 1.0])
        .f64s(&[0.0; 9])
        .f64s(&[0.0; 3])
        .f64s(&[0.0; 9])
        .f64s(&[accel_x, 0.0, 9.81])
        .f64s(&[0.0; 9])
        .finish()
}

#[allow(dead_code)]
pub fn navsat_fix(secs: u32, latitude: f64, longitude: f64) -> Vec<u8> {
    Encoder::new()
        .header(secs, secs, 0)
        .i8(0)
        .u16(1)
        .f64(latitude)
        .f64(longitude)
        .f64(12.0)
        .f64s(&[0.0; 9])
        .u8(2)
        .finish()
}

/// A CameraInfo message with a few calibration fields after the header.
#[allow(dead_code)]
pub fn camera_info(secs: u32) -> Vec<u8> {
    Encoder::new()
        .header(secs, secs, 0)
        .u32(720)
        .u32(1280)
        .string("plumb_bob")
        .finish()
}

fn pose(encoder: Encoder, x: f64) -> Encoder {
    encoder.f64s(&[x, 0.0, 0.0]).f64s(&[0.0, 0.0, 0.0, 1.0])
}

fn twist(encoder: Encoder, linear_x: f64) -> Encoder {
    encoder.f64s(&[linear_x, 0.0, 0.0]).f64s(&[0.0; 3])
}

/// An Odometry message moving along x.
#[allow(dead_code)]
pub fn odometry(secs: u32, x: f64, linear_x: f64) -> Vec<u8> {
    let encoder = Encoder::new().header(secs, secs, 0).string("odom");
    let encoder = pose(encoder, x).f64s(&[0.0; 36]);
    twist(encoder, linear_x).f64s(&[0.0; 36]).finish()
}

#[allow(dead_code)]
pub fn pose_stamped(secs: u32, x: f64) -> Vec<u8> {
    pose(Encoder::new().header(secs, secs, 0), x).finish()
}

#[allow(dead_code)]
pub fn twist_stamped(secs: u32, linear_x: f64) -> Vec<u8> {
    twist(Encoder::new().header(secs, secs, 0), linear_x).finish()
}

struct Message {
    conn: u32,
    secs: u32,
    nsecs: u32,
    payload: Vec<u8>,
}

/// Writes uncompressed, single-chunk ROS1 bag files.
#[derive(Default)]
pub struct BagBuilder {
    connections: Vec<(String, String)>,
    messages: Vec<Message>,
}

#[allow(dead_code)]
impl BagBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a message, registering a connection on first use of the topic.
    pub fn message(mut self, topic: &str, msg_type: &str, secs: u32, nsecs: u32, payload: Vec<u8>) -> Self {
        let conn = match self.connections.iter().position(|(name, _)| name == topic) {
            Some(conn) => conn,
            None => {
                self.connections.push((topic.to_string(), msg_type.to_string()));
                self.connections.len() - 1
            }
        };
        self.messages.push(Message {
            conn: conn as u32,
            secs,
            nsecs,
            payload,
        });
        self
    }

    pub fn frame(self, topic: &str, secs: u32, nsecs: u32) -> Self {
        let data = encoded_frame((secs * 40 % 256) as u8);
        self.message(
            topic,
            MessageType::CompressedImage.name(),
            secs,
            nsecs,
            compressed_image(secs, nsecs, &data),
        )
    }

    pub fn imu(self, topic: &str, secs: u32, nsecs: u32, accel_x: f64) -> Self {
        self.message(topic, MessageType::Imu.name(), secs, nsecs, imu(secs, nsecs, accel_x))
    }

    pub fn write(self, path: impl AsRef<Path>) {
        let mut chunk = Vec::new();
        let mut declared = vec![false; self.connections.len()];
        let mut offsets: Vec<Vec<(u32, u32, u32)>> = vec![Vec::new(); self.connections.len()];

        for message in &self.messages {
            let conn = message.conn as usize;
            if !declared[conn] {
                declared[conn] = true;
                self.connection_record(&mut chunk, message.conn);
            }
            offsets[conn].push((message.secs, message.nsecs, chunk.len() as u32));
            record(
                &mut chunk,
                &[
                    ("op", vec![0x02]),
                    ("conn", message.conn.to_le_bytes().to_vec()),
                    ("time", time(message.secs, message.nsecs)),
                ],
                &message.payload,
            );
        }

        const CHUNK_POS: u64 = 13 + 4096;

        let mut body = Vec::new();
        record(
            &mut body,
            &[
                ("op", vec![0x05]),
                ("compression", b"none".to_vec()),
                ("size", (chunk.len() as u32).to_le_bytes().to_vec()),
            ],
            &chunk,
        );
        for (conn, entries) in offsets.iter().enumerate() {
            let mut data = Vec::new();
            for &(secs, nsecs, offset) in entries {
                data.extend(time(secs, nsecs));
                data.extend(offset.to_le_bytes());
            }
            record(
                &mut body,
                &[
                    ("op", vec![0x04]),
                    ("ver", 1u32.to_le_bytes().to_vec()),
                    ("conn", (conn as u32).to_le_bytes().to_vec()),
                    ("count", (entries.len() as u32).to_le_bytes().to_vec()),
                ],
                &data,
            );
        }

        let index_pos = CHUNK_POS + body.len() as u64;
        for conn in 0..self.connections.len() {
            self.connection_record(&mut body, conn as u32);
        }
        if !self.messages.is_empty() {
            let start = self.messages.iter().map(|m| (m.secs, m.nsecs)).min().unwrap();
            let end = self.messages.iter().map(|m| (m.secs, m.nsecs)).max().unwrap();
            let mut data = Vec::new();
            for (conn, entries) in offsets.iter().enumerate() {
                data.extend((conn as u32).to_le_bytes());
                data.extend((entries.len() as u32).to_le_bytes());
            }
            record(
                &mut body,
                &[
                    ("op", vec![0x06]),
                    ("ver", 1u32.to_le_bytes().to_vec()),
                    ("chunk_pos", CHUNK_POS.to_le_bytes().to_vec()),
                    ("start_time", time(start.0, start.1)),
                    ("end_time", time(end.0, end.1)),
                    ("count", (self.connections.len() as u32).to_le_bytes().to_vec()),
                ],
                &data,
            );
        }

        let mut file = b"#ROSBAG V2.0\n".to_vec();
        let chunk_count: u32 = if self.messages.is_empty() { 0 } else { 1 };
        let header_fields = [
            ("op", vec![0x03]),
            ("index_pos", index_pos.to_le_bytes().to_vec()),
            ("conn_count", (self.connections.len() as u32).to_le_bytes().to_vec()),
            ("chunk_count", chunk_count.to_le_bytes().to_vec()),
        ];
        let header_len: usize = header_fields
            .iter()
            .map(|(name, value)| 4 + name.len() + 1 + value.len())
            .sum();
        let padding = vec![b' '; 4096 - 4 - header_len - 4];
        record(&mut file, &header_fields, &padding);
        assert_eq!(file.len() as u64, CHUNK_POS);

        file.extend(body);
        fs::write(path, file).unwrap();
    }

    fn connection_record(&self, out: &mut Vec<u8>, conn: u32) {
        let (topic, msg_type) = &self.connections[conn as usize];
        let mut data = Vec::new();
        for (name, value) in [
            ("topic", topic.as_str()),
            ("type", msg_type.as_str()),
            ("md5sum", "00000000000000000000000000000000"),
            ("message_definition", ""),
        ] {
            field(&mut data, name, value.as_bytes());
        }
        record(
            out,
            &[
                ("op", vec![0x07]),
                ("conn", conn.to_le_bytes().to_vec()),
                ("topic", topic.as_bytes().to_vec()),
            ],
            &data,
        );
    }
}

fn time(secs: u32, nsecs: u32) -> Vec<u8> {
    let mut bytes = secs.to_le_bytes().to_vec();
    bytes.extend(nsecs.to_le_bytes());
    bytes
}

fn field(out: &mut Vec<u8>, name: &str, value: &[u8]) {
    out.write_u32::<LittleEndian>((name.len() + 1 + value.len()) as u32)
        .unwrap();
    out.extend_from_slice(name.as_bytes());
    out.push(b'=');
    out.extend_from_slice(value);
}

fn record(out: &mut Vec<u8>, fields: &[(&str, Vec<u8>)], data: &[u8]) {
    let mut header = Vec::new();
    for (name, value) in fields {
        field(&mut header, name, value);
    }
    out.write_u32::<LittleEndian>(header.len() as u32).unwrap();
    out.extend(header);
    out.write_u32::<LittleEndian>(data.len() as u32).unwrap();
    out.extend_from_slice(data);
}

/// Reads a CSV table as rows of cells, header row included.
#[allow(dead_code)]
pub fn read_table(path: impl AsRef<Path>) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .unwrap();
    reader
        .records()
        .map(|record| record.unwrap().iter().map(str::to_string).collect())
        .collect()
}

/// Extracts one column by header name, without the header.
#[allow(dead_code)]
pub fn column(table: &[Vec<String>], name: &str) -> Vec<String> {
    let index = table[0]
        .iter()
        .position(|cell| cell == name)
        .unwrap_or_else(|| panic!("no column {name} in {:?}", table[0]));
    table[1..].iter().map(|row| row[index].clone()).collect()
}
