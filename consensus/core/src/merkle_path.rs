use crate::{
    errors::{EnvelopeError, EnvelopeResult},
    hashing::HasherExtensions,
    reader::WireReader,
    tx::TransactionId,
};
use overlay_hashes::{Hash, HasherBase};

const FLAG_DUPLICATE: u8 = 0x01;
const FLAG_TXID: u8 = 0x02;

/// Deepest tree a merkle path may describe.
pub const MAX_TREE_HEIGHT: u8 = 64;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathLeaf {
    pub offset: u64,
    /// `None` when the leaf duplicates its sibling.
    pub hash: Option<Hash>,
    /// Marks the hash as the id of a transaction the path proves.
    pub txid: bool,
}

/// A compact merkle path (BUMP) tying one or more transactions to a block.
///
/// Paths are kept structurally so envelopes re-encode unchanged. Proof verification
/// belongs to chain tracking and is not done here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MerklePath {
    pub block_height: u64,
    /// Leaves per tree level, level zero first.
    pub path: Vec<Vec<PathLeaf>>,
}

impl MerklePath {
    pub fn read(reader: &mut WireReader) -> EnvelopeResult<Self> {
        let block_height = reader.read_var_int()?;
        let tree_height = reader.read_u8()?;
        if tree_height > MAX_TREE_HEIGHT {
            return Err(EnvelopeError::InvalidTreeHeight(tree_height));
        }
        let mut path = Vec::with_capacity(tree_height as usize);
        for _ in 0..tree_height {
            let count = reader.read_len()?;
            let mut leaves = Vec::new();
            for _ in 0..count {
                let offset = reader.read_var_int()?;
                let flags = reader.read_u8()?;
                let hash = if flags & FLAG_DUPLICATE != 0 { None } else { Some(reader.read_hash()?) };
                leaves.push(PathLeaf { offset, hash, txid: flags & FLAG_TXID != 0 });
            }
            path.push(leaves);
        }
        Ok(Self { block_height, path })
    }

    pub fn write<T: HasherBase>(&self, writer: &mut T) {
        writer.write_var_int(self.block_height).write_u8(self.path.len() as u8);
        for leaves in self.path.iter() {
            writer.write_len(leaves.len());
            for leaf in leaves {
                let flags = match (&leaf.hash, leaf.txid) {
                    (None, _) => FLAG_DUPLICATE,
                    (Some(_), true) => FLAG_TXID,
                    (Some(_), false) => 0,
                };
                writer.write_var_int(leaf.offset).write_u8(flags);
                if let Some(hash) = leaf.hash {
                    writer.update(hash);
                }
            }
        }
    }

    /// Whether the path lists `txid` as one of the transactions it proves.
    pub fn contains(&self, txid: &TransactionId) -> bool {
        self.path.first().is_some_and(|leaves| leaves.iter().any(|leaf| leaf.txid && leaf.hash.as_ref() == Some(txid)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::ByteWriter;

    fn sample_path() -> MerklePath {
        MerklePath {
            block_height: 813_706,
            path: vec![
                vec![
                    PathLeaf { offset: 3048, hash: Some(Hash::from_bytes([1; 32])), txid: true },
                    PathLeaf { offset: 3049, hash: Some(Hash::from_bytes([2; 32])), txid: false },
                ],
                vec![PathLeaf { offset: 1525, hash: None, txid: false }],
            ],
        }
    }

    #[test]
    fn test_read_write() {
        let path = sample_path();
        let mut writer = ByteWriter::new();
        path.write(&mut writer);
        let bytes = writer.into_bytes();

        // block height 813706 is 0xc6a8a, a four byte compact size
        assert_eq!(&bytes[..6], &[0xfe, 0x8a, 0x6a, 0x0c, 0x00, 0x02]);

        let mut reader = WireReader::new(&bytes);
        assert_eq!(MerklePath::read(&mut reader).unwrap(), path);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_contains() {
        let path = sample_path();
        assert!(path.contains(&Hash::from_bytes([1; 32])));
        // listed, but as a sibling hash rather than a proven txid
        assert!(!path.contains(&Hash::from_bytes([2; 32])));
        assert!(!path.contains(&Hash::from_bytes([3; 32])));
    }

    #[test]
    fn test_tree_height_bound() {
        let data = [0x01, MAX_TREE_HEIGHT + 1];
        assert_eq!(MerklePath::read(&mut WireReader::new(&data)), Err(EnvelopeError::InvalidTreeHeight(65)));
    }
}
