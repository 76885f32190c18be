// Block data structures

use super::serialize::{Serializable, write_varint};
use crate::core::{Hash256, Transaction, hash256};

/// Serialized header size in bytes
pub const HEADER_SIZE: usize = 80;

/// Byte offset of the nonce inside a serialized header
pub const NONCE_OFFSET: usize = 76;

/// Block header - 80 bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHeader {
    /// Block version
    pub version: u32,
    /// Hash of the previous block
    pub prev_block_hash: Hash256,
    /// Merkle root of all transactions in the block
    pub merkle_root: Hash256,
    /// Block timestamp (Unix epoch)
    pub timestamp: u32,
    /// Difficulty target (compact format)
    pub bits: u32,
    /// Nonce for proof-of-work
    pub nonce: u32,
}

impl BlockHeader {
    /// Create a new block header
    pub fn new(
        version: u32,
        prev_block_hash: Hash256,
        merkle_root: Hash256,
        timestamp: u32,
        bits: u32,
        nonce: u32,
    ) -> Self {
        Self {
            version,
            prev_block_hash,
            merkle_root,
            timestamp,
            bits,
            nonce,
        }
    }

    /// Calculate the hash of this block header
    pub fn hash(&self) -> Hash256 {
        hash256(&self.to_bytes())
    }

    /// Serialize the block header (always 80 bytes)
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[0..4].copy_from_slice(&self.version.to_le_bytes());
        buf[4..36].copy_from_slice(self.prev_block_hash.as_bytes());
        buf[36..68].copy_from_slice(self.merkle_root.as_bytes());
        buf[68..72].copy_from_slice(&self.timestamp.to_le_bytes());
        buf[72..76].copy_from_slice(&self.bits.to_le_bytes());
        buf[NONCE_OFFSET..].copy_from_slice(&self.nonce.to_le_bytes());
        buf
    }
}

impl Serializable for BlockHeader {
    fn serialize_into(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.to_bytes());
    }
}

/// Block - contains header and transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Block header
    pub header: BlockHeader,
    /// Transactions in this block
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// Create a new block
    pub fn new(header: BlockHeader, transactions: Vec<Transaction>) -> Self {
        Self {
            header,
            transactions,
        }
    }

    /// Calculate Merkle root from transactions
    ///
    /// A lone transaction is its own root.
    pub fn calculate_merkle_root(transactions: &[Transaction]) -> Hash256 {
        if transactions.is_empty() {
            return Hash256::zero();
        }

        let mut hashes: Vec<Hash256> = transactions.iter().map(|tx| tx.txid()).collect();

        while hashes.len() > 1 {
            let mut next_level = Vec::with_capacity(hashes.len().div_ceil(2));

            for chunk in hashes.chunks(2) {
                let left = chunk[0];
                // Odd count: last hash pairs with itself
                let right = chunk.get(1).copied().unwrap_or(left);

                let mut combined = [0u8; 64];
                combined[..32].copy_from_slice(left.as_bytes());
                combined[32..].copy_from_slice(right.as_bytes());
                next_level.push(hash256(&combined));
            }

            hashes = next_level;
        }

        hashes[0]
    }

    /// Get the block hash
    pub fn hash(&self) -> Hash256 {
        self.header.hash()
    }

    /// Check if this is a genesis block
    pub fn is_genesis(&self) -> bool {
        self.header.prev_block_hash == Hash256::zero()
    }
}

impl Serializable for Block {
    fn serialize_into(&self, buf: &mut Vec<u8>) {
        self.header.serialize_into(buf);
        write_varint(buf, self.transactions.len() as u64);
        for tx in &self.transactions {
            tx.serialize_into(buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TxOutput;

    fn sample_header() -> BlockHeader {
        BlockHeader::new(
            1,
            Hash256::zero(),
            Hash256::new([0x11; 32]),
            1234567890,
            0x1d00ffff,
            0xdeadbeef,
        )
    }

    #[test]
    fn test_block_header_layout() {
        let bytes = sample_header().to_bytes();
        assert_eq!(bytes.len(), HEADER_SIZE);
        assert_eq!(&bytes[0..4], &[1, 0, 0, 0]);
        assert_eq!(&bytes[4..36], &[0u8; 32]);
        assert_eq!(&bytes[36..68], &[0x11; 32]);
        assert_eq!(&bytes[68..72], &1234567890u32.to_le_bytes());
        assert_eq!(&bytes[72..76], &[0xff, 0xff, 0x00, 0x1d]);
        assert_eq!(&bytes[NONCE_OFFSET..], &[0xef, 0xbe, 0xad, 0xde]);
        assert_eq!(sample_header().serialize(), bytes.to_vec());
    }

    #[test]
    fn test_block_hash() {
        let header = sample_header();
        assert_eq!(header.hash(), hash256(&header.to_bytes()));

        let mut other = header.clone();
        other.nonce += 1;
        assert_ne!(header.hash(), other.hash());
    }

    #[test]
    fn test_merkle_root_single_tx() {
        let tx = Transaction::coinbase(vec![4, 5, 6], TxOutput::new(5_000_000_000, vec![1, 2, 3]));
        let merkle = Block::calculate_merkle_root(std::slice::from_ref(&tx));
        assert_eq!(merkle, tx.txid());
    }

    #[test]
    fn test_merkle_root_multiple_tx() {
        let tx1 = Transaction::coinbase(vec![1], TxOutput::new(1000, vec![]));
        let tx2 = Transaction::coinbase(vec![2], TxOutput::new(2000, vec![]));

        let mut combined = Vec::new();
        combined.extend_from_slice(tx1.txid().as_bytes());
        combined.extend_from_slice(tx2.txid().as_bytes());

        let merkle = Block::calculate_merkle_root(&[tx1.clone(), tx2]);
        assert_eq!(merkle, hash256(&combined));
        assert_ne!(merkle, tx1.txid());
    }

    #[test]
    fn test_block_serialization() {
        let tx = Transaction::coinbase(vec![7], TxOutput::new(1, vec![]));
        let block = Block::new(sample_header(), vec![tx.clone()]);
        assert!(block.is_genesis());

        let bytes = block.serialize();
        assert_eq!(&bytes[..HEADER_SIZE], &block.header.to_bytes());
        assert_eq!(bytes[HEADER_SIZE], 1);
        assert_eq!(&bytes[HEADER_SIZE + 1..], tx.serialize().as_slice());
    }
}
