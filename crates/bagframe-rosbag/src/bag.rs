use crate::msgs::{MessageType, RosMessage};
use bagframe_core::{Record, RecordIter, RecordSource, TopicInfo};
use eyre::{Result, WrapErr, bail, eyre};
use indexmap::IndexMap;
use rosbag::{ChunkRecord, MessageRecord, RosBag};
use std::{
    collections::HashMap,
    fmt::Debug,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

/// A ROS1 bag file opened for conversion.
pub struct RosbagSource {
    path: PathBuf,
    bag: RosBag,
    index: Option<IndexMap<String, TopicInfo>>,
}

impl RosbagSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bag = RosBag::new(path).map_err(|err| {
            eyre!("unable to open bag file {}: {err:?}", path.display())
        })?;
        info!(path = %path.display(), "Opened bag file");

        Ok(Self {
            path: path.to_path_buf(),
            bag,
            index: None,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Scans every chunk once and tallies messages per topic.
    fn scan(&self) -> Result<IndexMap<String, TopicInfo>> {
        let mut connections: HashMap<u32, String> = HashMap::new();
        let mut topics: IndexMap<String, TopicInfo> = IndexMap::new();

        for record in self.bag.chunk_records() {
            let ChunkRecord::Chunk(chunk) = record.map_err(bag_error)? else {
                continue;
            };

            for message in chunk.messages() {
                match message.map_err(bag_error)? {
                    MessageRecord::Connection(conn) => {
                        connections.insert(conn.id, conn.topic.to_string());
                        topics
                            .entry(conn.topic.to_string())
                            .or_insert_with(|| TopicInfo::new(conn.tp));
                    }
                    MessageRecord::MessageData(data) => {
                        let info = connections
                            .get(&data.conn_id)
                            .and_then(|topic| topics.get_mut(topic));
                        let Some(info) = info else {
                            bail!(
                                "message refers to unknown connection {} in {}",
                                data.conn_id,
                                self.path.display()
                            );
                        };
                        info.observe(nanos_to_secs(data.time));
                    }
                }
            }
        }

        debug!(
            num_topics = topics.len(),
            num_connections = connections.len(),
            "Scanned bag file"
        );
        Ok(topics)
    }

    /// Resolves the message type of every requested topic.
    fn resolve_types(&mut self, topics: &[String]) -> Result<HashMap<String, MessageType>> {
        let index = self.topics()?;

        topics
            .iter()
            .filter_map(|topic| index.get(topic).map(|info| (topic, info)))
            .map(|(topic, info)| {
                let Some(ty) = MessageType::from_name(&info.msg_type) else {
                    let supported: Vec<_> = MessageType::ALL.iter().map(|ty| ty.name()).collect();
                    bail!(
                        "topic {topic} has unsupported message type {} (supported: {})",
                        info.msg_type,
                        supported.join(", ")
                    );
                };
                Ok((topic.clone(), ty))
            })
            .collect()
    }
}

impl RecordSource for RosbagSource {
    type Message = RosMessage;

    fn topics(&mut self) -> Result<IndexMap<String, TopicInfo>> {
        if self.index.is_none() {
            self.index = Some(self.scan()?);
        }
        Ok(self.index.clone().unwrap_or_default())
    }

    fn records(&mut self, topics: &[String]) -> Result<RecordIter<'_, RosMessage>> {
        let wanted = self.resolve_types(topics)?;
        let mut connections: HashMap<u32, (String, MessageType)> = HashMap::new();

        // Connection records precede the first message on that connection
        // within the chunk stream, so the table fills up as we go.
        let iter = self.bag.chunk_records().flat_map(move |record| {
            let chunk = match record {
                Ok(ChunkRecord::Chunk(chunk)) => chunk,
                Ok(_) => return Vec::new(),
                Err(err) => return vec![Err(bag_error(err))],
            };

            chunk
                .messages()
                .filter_map(|message| match message {
                    Err(err) => Some(Err(bag_error(err))),
                    Ok(MessageRecord::Connection(conn)) => {
                        if let Some(&ty) = wanted.get(conn.topic) {
                            connections.insert(conn.id, (conn.topic.to_string(), ty));
                        }
                        None
                    }
                    Ok(MessageRecord::MessageData(data)) => {
                        let (topic, ty) = connections.get(&data.conn_id)?;
                        let record = RosMessage::decode(*ty, data.data)
                            .wrap_err_with(|| format!("unable to decode a message on {topic}"))
                            .map(|message| Record {
                                topic: topic.clone(),
                                message,
                                time: nanos_to_secs(data.time),
                            });
                        Some(record)
                    }
                })
                .collect::<Vec<_>>()
        });

        Ok(Box::new(iter))
    }
}

fn bag_error(err: impl Debug) -> eyre::Report {
    eyre!("corrupted bag file: {err:?}")
}

fn nanos_to_secs(nanos: u64) -> f64 {
    nanos as f64 / 1e9
}
