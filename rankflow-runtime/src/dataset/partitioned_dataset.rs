/// Records split into a fixed number of partitions. Each partition is the
/// unit of work of one transform task.
#[derive(Debug, Clone)]
pub struct PartitionedDataset<T> {
    partitions: Vec<Vec<T>>,
}

impl<T> PartitionedDataset<T> {
    /// Splits `records` into `partitions` contiguous chunks, keeping their
    /// order, the way input splits cover a file.
    pub fn split(records: Vec<T>, partitions: usize) -> Self {
        let partitions = partitions.max(1);
        let chunk = records.len().div_ceil(partitions).max(1);
        let mut parts: Vec<Vec<T>> = (0..partitions).map(|_| Vec::new()).collect();
        for (i, record) in records.into_iter().enumerate() {
            parts[(i / chunk).min(partitions - 1)].push(record);
        }
        Self { partitions: parts }
    }

    pub fn from_partitions(partitions: Vec<Vec<T>>) -> Self {
        Self { partitions }
    }

    pub fn partitions(&self) -> usize {
        self.partitions.len()
    }

    pub fn partition(&self, index: usize) -> &[T] {
        self.partitions
            .get(index)
            .map(|p| p.as_slice())
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.partitions.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.partitions.iter().flat_map(|p| p.iter())
    }

    pub fn into_partitions(self) -> Vec<Vec<T>> {
        self.partitions
    }

    pub fn into_records(self) -> Vec<T> {
        self.partitions.into_iter().flatten().collect()
    }
}
