// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Host-side model container packing
//!
//! The builder assembles the same layout [`crate::model::Model`] verifies,
//! and is what the `pack_model` tool and the test suite use to produce
//! blobs. It is std-only, boards consume containers, they do not produce
//! them.

use std::io::Write;
use std::vec::Vec;

use byteorder::{LittleEndian, WriteBytesExt};

use crate::model::{MAX_IO_TENSORS, MAX_MODEL_OPS, MODEL_MAGIC, SUPPORTED_SCHEMA_VERSION};
use crate::ops::OpKind;
use crate::tensor::TensorDesc;

/// Errors raised while packing a model container
#[derive(Debug, thiserror::Error)]
pub enum BuilderError {
    /// More operators than a container may declare
    #[error("model may declare at most {max} operators, {count} were given")]
    TooManyOperators {
        /// Operators given to the builder
        count: usize,
        /// Largest operator table a container may declare
        max: usize,
    },
    /// More tensors in one direction than a container may declare
    #[error("model may declare at most {max} tensors per direction, {count} were given")]
    TooManyTensors {
        /// Tensors given to the builder in that direction
        count: usize,
        /// Largest tensor table a container may declare per direction
        max: usize,
    },
    /// Payload does not fit the u32 length field
    #[error("payload of {len} bytes does not fit the container length field")]
    PayloadTooLarge {
        /// Payload length given to the builder
        len: usize,
    },
    /// Write into the output buffer failed
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Builder for model container blobs
///
/// Starts at [`SUPPORTED_SCHEMA_VERSION`], override with
/// [`ModelBuilder::schema_version`] to produce deliberately incompatible
/// blobs for tests.
///
/// # Examples
///
/// ```
/// use sigil_runtime::{ElementType, Model, ModelBuilder, OpKind, TensorDesc};
///
/// let blob = ModelBuilder::new()
///     .operator(OpKind::Softmax)
///     .input(TensorDesc::new(ElementType::F32, &[1, 4]).unwrap())
///     .payload(&[0x01, 0x02])
///     .build()
///     .unwrap();
///
/// let model = Model::from_bytes(&blob).unwrap();
/// assert_eq!(model.op_code(0), Some(OpKind::Softmax.code()));
/// assert_eq!(model.payload(), &[0x01, 0x02]);
/// ```
#[derive(Debug, Clone)]
pub struct ModelBuilder {
    schema_version: u32,
    ops: Vec<u32>,
    inputs: Vec<TensorDesc>,
    outputs: Vec<TensorDesc>,
    payload: Vec<u8>,
}

impl ModelBuilder {
    /// Empty builder at the supported schema version
    pub fn new() -> Self {
        Self {
            schema_version: SUPPORTED_SCHEMA_VERSION,
            ops: Vec::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            payload: Vec::new(),
        }
    }

    /// Override the schema version written into the header
    pub fn schema_version(mut self, version: u32) -> Self {
        self.schema_version = version;
        self
    }

    /// Append an operator to the graph table
    pub fn operator(mut self, op: OpKind) -> Self {
        self.ops.push(op.code());
        self
    }

    /// Append a raw operator code, including codes the runtime rejects
    pub fn raw_operator(mut self, code: u32) -> Self {
        self.ops.push(code);
        self
    }

    /// Append an input tensor descriptor
    pub fn input(mut self, desc: TensorDesc) -> Self {
        self.inputs.push(desc);
        self
    }

    /// Append an output tensor descriptor
    pub fn output(mut self, desc: TensorDesc) -> Self {
        self.outputs.push(desc);
        self
    }

    /// Set the opaque engine payload
    pub fn payload(mut self, bytes: &[u8]) -> Self {
        self.payload = bytes.to_vec();
        self
    }

    /// Pack the container
    pub fn build(self) -> Result<Vec<u8>, BuilderError> {
        if self.ops.len() > MAX_MODEL_OPS {
            return Err(BuilderError::TooManyOperators {
                count: self.ops.len(),
                max: MAX_MODEL_OPS,
            });
        }
        if self.inputs.len() > MAX_IO_TENSORS {
            return Err(BuilderError::TooManyTensors {
                count: self.inputs.len(),
                max: MAX_IO_TENSORS,
            });
        }
        if self.outputs.len() > MAX_IO_TENSORS {
            return Err(BuilderError::TooManyTensors {
                count: self.outputs.len(),
                max: MAX_IO_TENSORS,
            });
        }
        if self.payload.len() > u32::MAX as usize {
            return Err(BuilderError::PayloadTooLarge { len: self.payload.len() });
        }

        let mut out = Vec::new();
        out.write_all(&MODEL_MAGIC)?;
        out.write_u32::<LittleEndian>(self.schema_version)?;
        out.write_u8(self.ops.len() as u8)?;
        out.write_u8(self.inputs.len() as u8)?;
        out.write_u8(self.outputs.len() as u8)?;
        out.write_u8(0)?; // reserved
        out.write_u32::<LittleEndian>(self.payload.len() as u32)?;
        for &code in &self.ops {
            out.write_u32::<LittleEndian>(code)?;
        }
        for desc in self.inputs.iter().chain(self.outputs.iter()) {
            out.write_u8(desc.element_type().code())?;
            out.write_u8(desc.rank() as u8)?;
            for &dim in desc.dims() {
                out.write_u32::<LittleEndian>(dim)?;
            }
        }
        out.write_all(&self.payload)?;
        Ok(out)
    }
}

impl Default for ModelBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Model;
    use crate::tensor::ElementType;

    #[test]
    fn built_blob_verifies_and_reads_back() {
        let blob = ModelBuilder::new()
            .operator(OpKind::DepthwiseConv2d)
            .operator(OpKind::Softmax)
            .input(TensorDesc::new(ElementType::F32, &[1, 128, 3, 1]).unwrap())
            .output(TensorDesc::new(ElementType::F32, &[1, 4]).unwrap())
            .payload(&[9, 8, 7])
            .build()
            .unwrap();

        let model = Model::from_bytes(&blob).unwrap();
        assert_eq!(model.schema_version(), SUPPORTED_SCHEMA_VERSION);
        assert_eq!(model.operator_count(), 2);
        assert_eq!(model.op_code(0), Some(1));
        assert_eq!(model.op_code(1), Some(5));
        assert_eq!(model.input_desc(0).unwrap().dims(), &[1, 128, 3, 1]);
        assert_eq!(model.output_desc(0).unwrap().dims(), &[1, 4]);
        assert_eq!(model.payload(), &[9, 8, 7]);
    }

    #[test]
    fn version_override_is_written() {
        let blob = ModelBuilder::new().schema_version(2).build().unwrap();
        let model = Model::from_bytes(&blob).unwrap();
        assert_eq!(model.schema_version(), 2);
    }

    #[test]
    fn raw_operator_codes_pass_through() {
        let blob = ModelBuilder::new().raw_operator(99).build().unwrap();
        let model = Model::from_bytes(&blob).unwrap();
        assert_eq!(model.op_code(0), Some(99));
    }

    #[test]
    fn operator_cap_is_enforced() {
        let mut builder = ModelBuilder::new();
        for _ in 0..9 {
            builder = builder.operator(OpKind::Conv2d);
        }
        let err = builder.build().unwrap_err();
        assert!(matches!(err, BuilderError::TooManyOperators { count: 9, .. }));
    }

    #[test]
    fn tensor_cap_is_enforced() {
        let desc = TensorDesc::new(ElementType::U8, &[1]).unwrap();
        let mut builder = ModelBuilder::new();
        for _ in 0..5 {
            builder = builder.input(desc.clone());
        }
        let err = builder.build().unwrap_err();
        assert!(matches!(err, BuilderError::TooManyTensors { count: 5, .. }));
    }

    #[test]
    fn empty_builder_packs_a_bare_header() {
        let blob = ModelBuilder::new().build().unwrap();
        assert_eq!(blob.len(), 16);
        let model = Model::from_bytes(&blob).unwrap();
        assert_eq!(model.operator_count(), 0);
        assert!(model.payload().is_empty());
    }
}
