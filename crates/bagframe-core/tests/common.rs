use bagframe_core::{FieldWriter, Flatten, MemorySource};
use image::{ImageBuffer, ImageFormat, Rgb};
use std::{io::Cursor, path::Path};

pub const REFERENCE_TOPIC: &str = "/zed2/zed_node/left/image_rect_color/compressed";
pub const REFERENCE_KEY: &str = "/zed2/zed_node/left/image_rect_color/compressed/data";
pub const REFERENCE_COLUMN: &str = "zed2";
pub const EYE_TOPIC: &str = "/left_eye/image/compressed";

#[derive(Debug, Clone, PartialEq)]
pub enum TestMessage {
    Frame {
        secs: u32,
        nsecs: u32,
        data: Vec<u8>,
    },
    Reading {
        secs: u32,
        nsecs: u32,
        value: f64,
    },
    Status {
        secs: u32,
        nsecs: u32,
        text: String,
    },
}

fn header(out: &mut FieldWriter<'_>, seq: u32, secs: u32, nsecs: u32) {
    out.scope("header", |out| {
        out.int("seq", seq).scope("stamp", |out| {
            out.int("secs", secs).int("nsecs", nsecs);
        });
        out.text("frame_id", "base_link");
    });
}

impl Flatten for TestMessage {
    fn flatten_into(&self, out: &mut FieldWriter<'_>) {
        match self {
            TestMessage::Frame { secs, nsecs, data } => {
                header(out, 0, *secs, *nsecs);
                out.text("format", "png").bytes("data", data);
            }
            TestMessage::Reading { secs, nsecs, value } => {
                header(out, 0, *secs, *nsecs);
                out.float("value", *value);
            }
            TestMessage::Status { secs, nsecs, text } => {
                header(out, 0, *secs, *nsecs);
                out.text("text", text);
            }
        }
    }
}

/// Encodes a tiny solid-color PNG.
pub fn encoded_frame(shade: u8) -> Vec<u8> {
    let frame: ImageBuffer<Rgb<u8>, Vec<u8>> =
        ImageBuffer::from_pixel(2, 2, Rgb([shade, 0, 255 - shade]));
    let mut bytes = Cursor::new(Vec::new());
    frame.write_to(&mut bytes, ImageFormat::Png).unwrap();
    bytes.into_inner()
}

/// RecordingBuilder for creating in-memory recordings. Messages are
/// replayed in the order they were added.
#[derive(Default)]
pub struct RecordingBuilder {
    source: MemorySource<TestMessage>,
}

#[allow(dead_code)]
impl RecordingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame(mut self, topic: &str, secs: u32, nsecs: u32) -> Self {
        let data = encoded_frame((secs % 256) as u8);
        let time = secs as f64;
        self.source.push(
            topic,
            "sensor_msgs/CompressedImage",
            time,
            TestMessage::Frame { secs, nsecs, data },
        );
        self
    }

    pub fn corrupt_frame(mut self, topic: &str, secs: u32) -> Self {
        self.source.push(
            topic,
            "sensor_msgs/CompressedImage",
            secs as f64,
            TestMessage::Frame {
                secs,
                nsecs: 0,
                data: b"garbage".to_vec(),
            },
        );
        self
    }

    pub fn reading(mut self, topic: &str, secs: u32, nsecs: u32, value: f64) -> Self {
        self.source.push(
            topic,
            "test_msgs/Reading",
            secs as f64,
            TestMessage::Reading { secs, nsecs, value },
        );
        self
    }

    pub fn readings(mut self, topic: &str, samples: &[(u32, f64)]) -> Self {
        for &(secs, value) in samples {
            self = self.reading(topic, secs, 0, value);
        }
        self
    }

    pub fn status(mut self, topic: &str, secs: u32, text: &str) -> Self {
        self.source.push(
            topic,
            "test_msgs/Status",
            secs as f64,
            TestMessage::Status {
                secs,
                nsecs: 0,
                text: text.to_string(),
            },
        );
        self
    }

    pub fn declare(mut self, topic: &str) -> Self {
        self.source.declare(topic, "test_msgs/Reading");
        self
    }

    pub fn build(self) -> MemorySource<TestMessage> {
        self.source
    }
}

/// Reads a CSV table as rows of cells, header row included.
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
