use crate::types::{Flatten, Record, RecordIter, RecordSource, TopicInfo};
use eyre::Result;
use indexmap::{IndexMap, IndexSet};

/// A recording held in memory, replayed in insertion order.
#[derive(Debug, Clone)]
pub struct MemorySource<M> {
    types: IndexMap<String, String>,
    records: Vec<Record<M>>,
}

impl<M> Default for MemorySource<M> {
    fn default() -> Self {
        Self {
            types: IndexMap::new(),
            records: Vec::new(),
        }
    }
}

impl<M> MemorySource<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a topic, possibly without messages.
    pub fn declare(&mut self, topic: impl Into<String>, msg_type: impl Into<String>) -> &mut Self {
        self.types
            .entry(topic.into())
            .or_insert_with(|| msg_type.into());
        self
    }

    /// Appends a message recorded at `time` seconds.
    pub fn push(
        &mut self,
        topic: impl Into<String>,
        msg_type: impl Into<String>,
        time: f64,
        message: M,
    ) -> &mut Self {
        let topic = topic.into();
        self.declare(topic.clone(), msg_type);
        self.records.push(Record {
            topic,
            message,
            time,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<M> RecordSource for MemorySource<M>
where
    M: Flatten + Clone,
{
    type Message = M;

    fn topics(&mut self) -> Result<IndexMap<String, TopicInfo>> {
        let mut topics: IndexMap<String, TopicInfo> = self
            .types
            .iter()
            .map(|(topic, msg_type)| (topic.clone(), TopicInfo::new(msg_type.as_str())))
            .collect();

        for record in &self.records {
            if let Some(info) = topics.get_mut(&record.topic) {
                info.observe(record.time);
            }
        }

        Ok(topics)
    }

    fn records(&mut self, topics: &[String]) -> Result<RecordIter<'_, M>> {
        let wanted: IndexSet<String> = topics.iter().cloned().collect();
        let iter = self
            .records
            .iter()
            .filter(move |record| wanted.contains(&record.topic))
            .cloned()
            .map(Ok::<_, eyre::Report>);
        Ok(Box::new(iter))
    }
}
