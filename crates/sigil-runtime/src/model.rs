// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Zero-copy view over a Sigil model container
//!
//! A model blob is a single contiguous little-endian byte region laid out as:
//!
//! ```text
//! offset  size          field
//! 0       4             magic, the ASCII bytes "SIGM"
//! 4       4             schema version (u32)
//! 8       1             operator count
//! 9      1              input tensor count
//! 10      1             output tensor count
//! 11      1             reserved, written as zero
//! 12      4             payload length in bytes (u32)
//! 16      4 * ops       operator codes (u32 each)
//! ...     per tensor    input descriptors, then output descriptors
//! ...     payload       opaque engine payload
//! ```
//!
//! Each tensor descriptor is one element type code byte, one rank byte, then
//! `rank` dimensions as u32. The payload is never interpreted here, it belongs
//! to whichever execution backend the board links in.
//!
//! [`Model::from_bytes`] verifies the structure of the whole container before
//! returning a view, so every later accessor can index without re-checking
//! bounds. It deliberately does not judge the schema version, boards compare
//! [`Model::schema_version`] against [`SUPPORTED_SCHEMA_VERSION`] themselves
//! so a mismatch can be reported before any tensor planning starts.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::ModelError;
use crate::tensor::{ElementType, TensorDesc, MAX_RANK};

//region Constants

/// Magic bytes every model container starts with
pub const MODEL_MAGIC: [u8; 4] = *b"SIGM";

/// Container schema version this runtime understands
pub const SUPPORTED_SCHEMA_VERSION: u32 = 3;

/// Largest operator table a container may declare
pub const MAX_MODEL_OPS: usize = 8;

/// Largest tensor table a container may declare per direction
pub const MAX_IO_TENSORS: usize = 4;

const HEADER_LEN: usize = 16;
const VERSION_OFFSET: usize = 4;
const OP_COUNT_OFFSET: usize = 8;
const INPUT_COUNT_OFFSET: usize = 9;
const OUTPUT_COUNT_OFFSET: usize = 10;
const PAYLOAD_LEN_OFFSET: usize = 12;
const OP_CODE_SIZE: usize = 4;
const DESC_HEADER_SIZE: usize = 2;
const DIM_SIZE: usize = 4;

//endregion

/// Borrowed, structurally verified view over a model container
///
/// The view holds the blob bytes plus the descriptor offsets recorded while
/// walking the layout. Nothing is copied out of the blob.
///
/// # Examples
///
/// ```
/// use sigil_runtime::{Model, SUPPORTED_SCHEMA_VERSION};
///
/// // Smallest possible container: header only, no operators, no tensors.
/// let bytes = [
///     b'S', b'I', b'G', b'M', 3, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
/// ];
/// let model = Model::from_bytes(&bytes).unwrap();
/// assert_eq!(model.schema_version(), SUPPORTED_SCHEMA_VERSION);
/// assert_eq!(model.operator_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct Model<'m> {
    bytes: &'m [u8],
    schema_version: u32,
    op_count: usize,
    input_desc_offsets: heapless::Vec<u32, MAX_IO_TENSORS>,
    output_desc_offsets: heapless::Vec<u32, MAX_IO_TENSORS>,
    payload_offset: usize,
    payload_len: usize,
}

impl<'m> Model<'m> {
    //region Verification

    /// Verify a byte region as a model container and return a view over it
    ///
    /// Checks magic, table counts against their caps, descriptor ranks, and
    /// that the declared layout accounts for exactly the supplied length.
    /// Element type codes are left for descriptor decode so that a schema
    /// version mismatch can be reported ahead of them.
    pub fn from_bytes(bytes: &'m [u8]) -> Result<Self, ModelError> {
        if bytes.len() < HEADER_LEN {
            return Err(ModelError::Truncated { expected: HEADER_LEN, actual: bytes.len() });
        }

        // Magic
        if bytes[0..4] != MODEL_MAGIC {
            let mut found = [0u8; 4];
            found.copy_from_slice(&bytes[0..4]);
            return Err(ModelError::BadMagic { found });
        }

        let schema_version = LittleEndian::read_u32(&bytes[VERSION_OFFSET..VERSION_OFFSET + 4]);
        let op_count = bytes[OP_COUNT_OFFSET] as usize;
        let input_count = bytes[INPUT_COUNT_OFFSET] as usize;
        let output_count = bytes[OUTPUT_COUNT_OFFSET] as usize;
        let payload_len =
            LittleEndian::read_u32(&bytes[PAYLOAD_LEN_OFFSET..PAYLOAD_LEN_OFFSET + 4]) as usize;

        if op_count > MAX_MODEL_OPS {
            return Err(ModelError::TooManyOperators { count: op_count, max: MAX_MODEL_OPS });
        }
        if input_count > MAX_IO_TENSORS {
            return Err(ModelError::TooManyTensors { count: input_count, max: MAX_IO_TENSORS });
        }
        if output_count > MAX_IO_TENSORS {
            return Err(ModelError::TooManyTensors { count: output_count, max: MAX_IO_TENSORS });
        }

        // Operator table
        let mut cursor = HEADER_LEN + op_count * OP_CODE_SIZE;
        if bytes.len() < cursor {
            return Err(ModelError::Truncated { expected: cursor, actual: bytes.len() });
        }

        // Tensor descriptor tables, inputs first
        let mut input_desc_offsets = heapless::Vec::new();
        let mut output_desc_offsets = heapless::Vec::new();
        for direction in 0..2 {
            let (count, offsets) = if direction == 0 {
                (input_count, &mut input_desc_offsets)
            } else {
                (output_count, &mut output_desc_offsets)
            };
            for _ in 0..count {
                if bytes.len() < cursor + DESC_HEADER_SIZE {
                    return Err(ModelError::Truncated {
                        expected: cursor + DESC_HEADER_SIZE,
                        actual: bytes.len(),
                    });
                }
                let rank = bytes[cursor + 1];
                if rank as usize > MAX_RANK {
                    return Err(ModelError::RankOutOfRange { rank, max: MAX_RANK });
                }
                let desc_len = DESC_HEADER_SIZE + rank as usize * DIM_SIZE;
                if bytes.len() < cursor + desc_len {
                    return Err(ModelError::Truncated {
                        expected: cursor + desc_len,
                        actual: bytes.len(),
                    });
                }
                // Counts were capped above, the push cannot overflow
                let _ = offsets.push(cursor as u32);
                cursor += desc_len;
            }
        }

        // Payload must account for exactly the remaining bytes
        let total = cursor + payload_len;
        if bytes.len() < total {
            return Err(ModelError::Truncated { expected: total, actual: bytes.len() });
        }
        if bytes.len() > total {
            return Err(ModelError::TrailingBytes { expected: total, actual: bytes.len() });
        }

        Ok(Self {
            bytes,
            schema_version,
            op_count,
            input_desc_offsets,
            output_desc_offsets,
            payload_offset: cursor,
            payload_len,
        })
    }

    //endregion

    //region Accessors

    /// Schema version the container was packed with
    pub fn schema_version(&self) -> u32 {
        self.schema_version
    }

    /// Number of operators the graph names
    pub fn operator_count(&self) -> usize {
        self.op_count
    }

    /// Operator code at `index`, `None` past the table
    pub fn op_code(&self, index: usize) -> Option<u32> {
        if index >= self.op_count {
            return None;
        }
        let offset = HEADER_LEN + index * OP_CODE_SIZE;
        Some(LittleEndian::read_u32(&self.bytes[offset..offset + OP_CODE_SIZE]))
    }

    /// Iterator over all operator codes in table order
    pub fn op_codes(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.op_count).filter_map(move |i| self.op_code(i))
    }

    /// Number of input tensors the container declares
    pub fn input_count(&self) -> usize {
        self.input_desc_offsets.len()
    }

    /// Number of output tensors the container declares
    pub fn output_count(&self) -> usize {
        self.output_desc_offsets.len()
    }

    /// Decode the input tensor descriptor at `index`
    pub fn input_desc(&self, index: usize) -> Result<TensorDesc, ModelError> {
        match self.input_desc_offsets.get(index) {
            Some(&offset) => self.decode_desc(offset as usize),
            None => Err(ModelError::NoSuchTensor { index, count: self.input_count() }),
        }
    }

    /// Decode the output tensor descriptor at `index`
    pub fn output_desc(&self, index: usize) -> Result<TensorDesc, ModelError> {
        match self.output_desc_offsets.get(index) {
            Some(&offset) => self.decode_desc(offset as usize),
            None => Err(ModelError::NoSuchTensor { index, count: self.output_count() }),
        }
    }

    /// Opaque engine payload
    pub fn payload(&self) -> &'m [u8] {
        &self.bytes[self.payload_offset..self.payload_offset + self.payload_len]
    }

    /// The whole container as bytes
    pub fn as_bytes(&self) -> &'m [u8] {
        self.bytes
    }

    //endregion

    fn decode_desc(&self, offset: usize) -> Result<TensorDesc, ModelError> {
        let code = self.bytes[offset];
        let element_type =
            ElementType::from_code(code).ok_or(ModelError::UnknownElementType { code })?;
        let rank = self.bytes[offset + 1] as usize;
        let mut dims = [0u32; MAX_RANK];
        for (i, dim) in dims.iter_mut().take(rank).enumerate() {
            let at = offset + DESC_HEADER_SIZE + i * DIM_SIZE;
            *dim = LittleEndian::read_u32(&self.bytes[at..at + DIM_SIZE]);
        }
        TensorDesc::new(element_type, &dims[..rank])
    }
}
