// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Tensor planning and graph dispatch over a verified model
//!
//! The interpreter binds a [`Model`] view, the operator set a board
//! registered, and an owned [`TensorArena`]. [`Interpreter::allocate_tensors`]
//! checks that every operator the graph names is registered, then carves one
//! arena slot per declared tensor. After planning, typed views over the
//! carved storage are available and [`Interpreter::invoke`] hands the whole
//! working set to an [`ExecutionBackend`].
//!
//! The backend seam keeps kernel math out of the runtime. A board links a
//! compute engine and adapts it behind the trait, host tests drop in a
//! scripted stand-in.

use crate::arena::{TensorArena, TensorSlot};
use crate::error::{Result, RuntimeError};
use crate::model::{Model, MAX_IO_TENSORS, MAX_MODEL_OPS};
use crate::ops::{OpKind, OpResolver};
use crate::tensor::{ElementType, TensorDesc};

/// External compute engine the interpreter dispatches to
///
/// The runtime plans tensors and owns their storage, the backend owns the
/// math. `execute` reads the planned inputs and writes the planned outputs
/// in place through the context it receives.
pub trait ExecutionBackend {
    /// Run the graph once over the planned tensors
    fn execute(&mut self, ctx: &mut InvokeContext<'_, '_>) -> Result<()>;
}

#[derive(Debug)]
struct Binding {
    desc: TensorDesc,
    slot: TensorSlot,
}

/// Planned tensor state handed to an [`ExecutionBackend`] during invoke
pub struct InvokeContext<'a, 'm> {
    model: &'a Model<'m>,
    inputs: &'a [Binding],
    outputs: &'a [Binding],
    arena: &'a mut [u8],
}

impl<'a, 'm> InvokeContext<'a, 'm> {
    /// The model being executed, payload included
    pub fn model(&self) -> &Model<'m> {
        self.model
    }

    /// Number of planned input tensors
    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    /// Number of planned output tensors
    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    /// Descriptor of the input tensor at `index`
    pub fn input_desc(&self, index: usize) -> Option<&TensorDesc> {
        self.inputs.get(index).map(|b| &b.desc)
    }

    /// Descriptor of the output tensor at `index`
    pub fn output_desc(&self, index: usize) -> Option<&TensorDesc> {
        self.outputs.get(index).map(|b| &b.desc)
    }

    /// Raw bytes of the input tensor at `index`
    pub fn input_bytes(&self, index: usize) -> Result<&[u8]> {
        let b = get_binding(self.inputs, index)?;
        Ok(&self.arena[b.slot.offset()..b.slot.end()])
    }

    /// f32 view of the input tensor at `index`
    pub fn input_f32(&self, index: usize) -> Result<&[f32]> {
        let b = get_binding(self.inputs, index)?;
        f32_view(&self.arena[b.slot.offset()..b.slot.end()], &b.desc)
    }

    /// Mutable raw bytes of the output tensor at `index`
    pub fn output_bytes_mut(&mut self, index: usize) -> Result<&mut [u8]> {
        let b = get_binding(self.outputs, index)?;
        Ok(&mut self.arena[b.slot.offset()..b.slot.end()])
    }

    /// Mutable f32 view of the output tensor at `index`
    pub fn output_f32_mut(&mut self, index: usize) -> Result<&mut [f32]> {
        let b = get_binding(self.outputs, index)?;
        f32_view_mut(&mut self.arena[b.slot.offset()..b.slot.end()], &b.desc)
    }

    /// Shared input view and mutable output view at the same time
    ///
    /// Inputs are carved ahead of outputs, so the two regions never alias.
    pub fn io_f32(&mut self, input: usize, output: usize) -> Result<(&[f32], &mut [f32])> {
        let ib = get_binding(self.inputs, input)?;
        let ob = get_binding(self.outputs, output)?;
        let (head, tail) = self.arena.split_at_mut(ob.slot.offset());
        let in_bytes =
            head.get(ib.slot.offset()..ib.slot.end()).ok_or(RuntimeError::CastFailed)?;
        let out_bytes = tail.get_mut(..ob.slot.len()).ok_or(RuntimeError::CastFailed)?;
        Ok((f32_view(in_bytes, &ib.desc)?, f32_view_mut(out_bytes, &ob.desc)?))
    }
}

/// Tensor planner and dispatch loop over one model
///
/// The arena size is a const generic parameter, so the full tensor budget of
/// a board is fixed at compile time.
///
/// # Examples
///
/// ```
/// use sigil_runtime::{Interpreter, Model, OpKind, OpResolver, TensorArena};
///
/// // One Softmax operator, one f32 input of shape [4], no outputs.
/// let blob = [
///     b'S', b'I', b'G', b'M', 3, 0, 0, 0,
///     1, 1, 0, 0,
///     0, 0, 0, 0,
///     5, 0, 0, 0,
///     1, 1, 4, 0, 0, 0,
/// ];
/// let model = Model::from_bytes(&blob).unwrap();
/// let mut resolver = OpResolver::<1>::new();
/// resolver.register(OpKind::Softmax).unwrap();
///
/// let mut interpreter = Interpreter::new(model, &resolver, TensorArena::<64>::new());
/// interpreter.allocate_tensors().unwrap();
/// assert_eq!(interpreter.input(0).unwrap().dims(), &[4]);
/// ```
#[derive(Debug)]
pub struct Interpreter<'m, const N: usize> {
    model: Model<'m>,
    registered: heapless::Vec<OpKind, MAX_MODEL_OPS>,
    arena: TensorArena<N>,
    inputs: heapless::Vec<Binding, MAX_IO_TENSORS>,
    outputs: heapless::Vec<Binding, MAX_IO_TENSORS>,
    allocated: bool,
}

impl<'m, const N: usize> Interpreter<'m, N> {
    /// Bind a model, the registered operator set and an owned arena
    ///
    /// The resolver is copied, later registrations on it do not reach an
    /// interpreter that was already built.
    pub fn new<const CAP: usize>(
        model: Model<'m>,
        resolver: &OpResolver<CAP>,
        arena: TensorArena<N>,
    ) -> Self {
        let mut registered = heapless::Vec::new();
        for &op in resolver.registered() {
            if !registered.contains(&op) {
                // Distinct operator kinds never exceed the table size
                let _ = registered.push(op);
            }
        }
        Self {
            model,
            registered,
            arena,
            inputs: heapless::Vec::new(),
            outputs: heapless::Vec::new(),
            allocated: false,
        }
    }

    /// Check operator coverage and carve arena slots for every tensor
    ///
    /// Runs once per interpreter. Operator coverage is checked before any
    /// carving so a graph the board cannot execute never consumes arena
    /// space.
    pub fn allocate_tensors(&mut self) -> Result<()> {
        if self.allocated {
            return Err(RuntimeError::AlreadyAllocated);
        }

        for code in self.model.op_codes() {
            let op = OpKind::try_from(code)
                .map_err(|_| RuntimeError::UnknownOperator { code })?;
            if !self.registered.contains(&op) {
                return Err(RuntimeError::OperatorNotRegistered { op });
            }
        }

        for index in 0..self.model.input_count() {
            let desc = self.model.input_desc(index)?;
            let slot = self.arena.allocate(desc.byte_len()?)?;
            if self.inputs.push(Binding { desc, slot }).is_err() {
                return Err(RuntimeError::Model(crate::error::ModelError::TooManyTensors {
                    count: index + 1,
                    max: MAX_IO_TENSORS,
                }));
            }
        }
        for index in 0..self.model.output_count() {
            let desc = self.model.output_desc(index)?;
            let slot = self.arena.allocate(desc.byte_len()?)?;
            if self.outputs.push(Binding { desc, slot }).is_err() {
                return Err(RuntimeError::Model(crate::error::ModelError::TooManyTensors {
                    count: index + 1,
                    max: MAX_IO_TENSORS,
                }));
            }
        }

        self.allocated = true;
        Ok(())
    }

    /// The model this interpreter executes
    pub fn model(&self) -> &Model<'m> {
        &self.model
    }

    /// Arena bytes consumed by the tensor plan, alignment padding included
    pub fn arena_used_bytes(&self) -> usize {
        self.arena.used_bytes()
    }

    /// Descriptor of the planned input tensor at `index`
    pub fn input(&self, index: usize) -> Result<&TensorDesc> {
        Ok(&self.input_binding(index)?.desc)
    }

    /// Raw bytes of the planned input tensor at `index`
    pub fn input_bytes(&self, index: usize) -> Result<&[u8]> {
        let b = self.input_binding(index)?;
        Ok(&self.arena.bytes()[b.slot.offset()..b.slot.end()])
    }

    /// f32 view of the planned input tensor at `index`
    pub fn input_f32(&self, index: usize) -> Result<&[f32]> {
        let b = self.input_binding(index)?;
        f32_view(&self.arena.bytes()[b.slot.offset()..b.slot.end()], &b.desc)
    }

    /// Mutable f32 view of the planned input tensor at `index`
    ///
    /// This is how a board writes a capture window into the graph.
    pub fn input_f32_mut(&mut self, index: usize) -> Result<&mut [f32]> {
        let (slot, element_type) = {
            let b = self.input_binding(index)?;
            (b.slot, b.desc.element_type())
        };
        if element_type != ElementType::F32 {
            return Err(RuntimeError::ElementTypeMismatch {
                expected: ElementType::F32,
                found: element_type,
            });
        }
        bytemuck::try_cast_slice_mut(&mut self.arena.bytes_mut()[slot.offset()..slot.end()])
            .map_err(|_| RuntimeError::CastFailed)
    }

    /// Descriptor of the planned output tensor at `index`
    pub fn output(&self, index: usize) -> Result<&TensorDesc> {
        Ok(&self.output_binding(index)?.desc)
    }

    /// Raw bytes of the planned output tensor at `index`
    pub fn output_bytes(&self, index: usize) -> Result<&[u8]> {
        let b = self.output_binding(index)?;
        Ok(&self.arena.bytes()[b.slot.offset()..b.slot.end()])
    }

    /// f32 view of the planned output tensor at `index`
    pub fn output_f32(&self, index: usize) -> Result<&[f32]> {
        let b = self.output_binding(index)?;
        f32_view(&self.arena.bytes()[b.slot.offset()..b.slot.end()], &b.desc)
    }

    /// Dispatch one graph execution to a backend
    pub fn invoke(&mut self, backend: &mut dyn ExecutionBackend) -> Result<()> {
        if !self.allocated {
            return Err(RuntimeError::NotAllocated);
        }
        let mut ctx = InvokeContext {
            model: &self.model,
            inputs: &self.inputs,
            outputs: &self.outputs,
            arena: self.arena.bytes_mut(),
        };
        backend.execute(&mut ctx)
    }

    fn input_binding(&self, index: usize) -> Result<&Binding> {
        if !self.allocated {
            return Err(RuntimeError::NotAllocated);
        }
        self.inputs
            .get(index)
            .ok_or(RuntimeError::NoSuchTensor { index, count: self.inputs.len() })
    }

    fn output_binding(&self, index: usize) -> Result<&Binding> {
        if !self.allocated {
            return Err(RuntimeError::NotAllocated);
        }
        self.outputs
            .get(index)
            .ok_or(RuntimeError::NoSuchTensor { index, count: self.outputs.len() })
    }
}

fn get_binding(list: &[Binding], index: usize) -> Result<&Binding> {
    list.get(index).ok_or(RuntimeError::NoSuchTensor { index, count: list.len() })
}

fn f32_view<'a>(bytes: &'a [u8], desc: &TensorDesc) -> Result<&'a [f32]> {
    if desc.element_type() != ElementType::F32 {
        return Err(RuntimeError::ElementTypeMismatch {
            expected: ElementType::F32,
            found: desc.element_type(),
        });
    }
    bytemuck::try_cast_slice(bytes).map_err(|_| RuntimeError::CastFailed)
}

fn f32_view_mut<'a>(bytes: &'a mut [u8], desc: &TensorDesc) -> Result<&'a mut [f32]> {
    if desc.element_type() != ElementType::F32 {
        return Err(RuntimeError::ElementTypeMismatch {
            expected: ElementType::F32,
            found: desc.element_type(),
        });
    }
    bytemuck::try_cast_slice_mut(bytes).map_err(|_| RuntimeError::CastFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;

    // One Softmax operator, one f32 input of shape [4], one f32 output of
    // shape [2], no payload.
    const GRAPH: [u8; 32] = [
        b'S', b'I', b'G', b'M', 3, 0, 0, 0, // magic + version
        1, 1, 1, 0, // 1 op, 1 input, 1 output, reserved
        0, 0, 0, 0, // no payload
        5, 0, 0, 0, // Softmax
        1, 1, 4, 0, 0, 0, // f32, rank 1, dims [4]
        1, 1, 2, 0, 0, 0, // f32, rank 1, dims [2]
    ];

    fn softmax_resolver() -> OpResolver<1> {
        let mut resolver = OpResolver::new();
        resolver.register(OpKind::Softmax).unwrap();
        resolver
    }

    struct SumBackend;

    impl ExecutionBackend for SumBackend {
        fn execute(&mut self, ctx: &mut InvokeContext<'_, '_>) -> Result<()> {
            let (input, output) = ctx.io_f32(0, 0)?;
            output[0] = input.iter().sum();
            output[1] = input.len() as f32;
            Ok(())
        }
    }

    struct FailingBackend;

    impl ExecutionBackend for FailingBackend {
        fn execute(&mut self, _ctx: &mut InvokeContext<'_, '_>) -> Result<()> {
            Err(RuntimeError::InvokeFailed { status: -3 })
        }
    }

    #[test]
    fn allocate_plans_aligned_slots() {
        let model = Model::from_bytes(&GRAPH).unwrap();
        let mut interpreter = Interpreter::new(model, &softmax_resolver(), TensorArena::<64>::new());
        interpreter.allocate_tensors().unwrap();

        // Input takes 16 bytes at offset 0, output starts at the next
        // aligned offset
        assert_eq!(interpreter.input_bytes(0).unwrap().len(), 16);
        assert_eq!(interpreter.output_bytes(0).unwrap().len(), 8);
        assert_eq!(interpreter.arena_used_bytes(), 24);
        assert_eq!(interpreter.input(0).unwrap().dims(), &[4]);
        assert_eq!(interpreter.output(0).unwrap().dims(), &[2]);
    }

    #[test]
    fn accessors_require_allocation() {
        let model = Model::from_bytes(&GRAPH).unwrap();
        let mut interpreter = Interpreter::new(model, &softmax_resolver(), TensorArena::<64>::new());
        assert_eq!(interpreter.input(0).unwrap_err(), RuntimeError::NotAllocated);
        assert_eq!(interpreter.input_f32(0).unwrap_err(), RuntimeError::NotAllocated);
        assert_eq!(interpreter.output(0).unwrap_err(), RuntimeError::NotAllocated);
        let err = interpreter.invoke(&mut SumBackend).unwrap_err();
        assert_eq!(err, RuntimeError::NotAllocated);
    }

    #[test]
    fn allocate_runs_once() {
        let model = Model::from_bytes(&GRAPH).unwrap();
        let mut interpreter = Interpreter::new(model, &softmax_resolver(), TensorArena::<64>::new());
        interpreter.allocate_tensors().unwrap();
        assert_eq!(interpreter.allocate_tensors().unwrap_err(), RuntimeError::AlreadyAllocated);
    }

    #[test]
    fn unknown_operator_code_is_reported() {
        let mut blob = GRAPH;
        blob[16] = 9;
        let model = Model::from_bytes(&blob).unwrap();
        let mut interpreter = Interpreter::new(model, &softmax_resolver(), TensorArena::<64>::new());
        let err = interpreter.allocate_tensors().unwrap_err();
        assert_eq!(err, RuntimeError::UnknownOperator { code: 9 });
    }

    #[test]
    fn unregistered_operator_is_reported() {
        let model = Model::from_bytes(&GRAPH).unwrap();
        let empty = OpResolver::<1>::new();
        let mut interpreter = Interpreter::new(model, &empty, TensorArena::<64>::new());
        let err = interpreter.allocate_tensors().unwrap_err();
        assert_eq!(err, RuntimeError::OperatorNotRegistered { op: OpKind::Softmax });
        // Coverage is checked ahead of carving
        assert_eq!(interpreter.arena_used_bytes(), 0);
    }

    #[test]
    fn undersized_arena_is_reported() {
        let model = Model::from_bytes(&GRAPH).unwrap();
        let mut interpreter = Interpreter::new(model, &softmax_resolver(), TensorArena::<16>::new());
        let err = interpreter.allocate_tensors().unwrap_err();
        assert_eq!(err, RuntimeError::ArenaExhausted { requested: 24, capacity: 16 });
    }

    #[test]
    fn input_views_read_back_writes() {
        let model = Model::from_bytes(&GRAPH).unwrap();
        let mut interpreter = Interpreter::new(model, &softmax_resolver(), TensorArena::<64>::new());
        interpreter.allocate_tensors().unwrap();

        let window = interpreter.input_f32_mut(0).unwrap();
        assert_eq!(window.len(), 4);
        window.copy_from_slice(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(interpreter.input_f32(0).unwrap(), &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn invoke_dispatches_to_backend() {
        let model = Model::from_bytes(&GRAPH).unwrap();
        let mut interpreter = Interpreter::new(model, &softmax_resolver(), TensorArena::<64>::new());
        interpreter.allocate_tensors().unwrap();
        interpreter.input_f32_mut(0).unwrap().copy_from_slice(&[1.0, 2.0, 3.0, 4.0]);

        interpreter.invoke(&mut SumBackend).unwrap();
        assert_eq!(interpreter.output_f32(0).unwrap(), &[10.0, 4.0]);
    }

    #[test]
    fn backend_failure_propagates() {
        let model = Model::from_bytes(&GRAPH).unwrap();
        let mut interpreter = Interpreter::new(model, &softmax_resolver(), TensorArena::<64>::new());
        interpreter.allocate_tensors().unwrap();
        let err = interpreter.invoke(&mut FailingBackend).unwrap_err();
        assert_eq!(err, RuntimeError::InvokeFailed { status: -3 });
    }

    #[test]
    fn tensor_index_bounds_are_reported() {
        let model = Model::from_bytes(&GRAPH).unwrap();
        let mut interpreter = Interpreter::new(model, &softmax_resolver(), TensorArena::<64>::new());
        interpreter.allocate_tensors().unwrap();
        assert_eq!(
            interpreter.input(1).unwrap_err(),
            RuntimeError::NoSuchTensor { index: 1, count: 1 }
        );
        assert_eq!(
            interpreter.output_f32(3).unwrap_err(),
            RuntimeError::NoSuchTensor { index: 3, count: 1 }
        );
    }

    #[test]
    fn typed_access_checks_element_type() {
        let mut blob = GRAPH;
        blob[20] = 4; // input element type becomes i8
        let model = Model::from_bytes(&blob).unwrap();
        let mut interpreter = Interpreter::new(model, &softmax_resolver(), TensorArena::<64>::new());
        interpreter.allocate_tensors().unwrap();
        let err = interpreter.input_f32(0).unwrap_err();
        assert_eq!(
            err,
            RuntimeError::ElementTypeMismatch {
                expected: ElementType::F32,
                found: ElementType::I8,
            }
        );
        // Raw byte access still works
        assert_eq!(interpreter.input_bytes(0).unwrap().len(), 4);
    }

    #[test]
    fn bad_descriptor_surfaces_during_allocation() {
        let mut blob = GRAPH;
        blob[20] = 99; // unknown element type code
        let model = Model::from_bytes(&blob).unwrap();
        let mut interpreter = Interpreter::new(model, &softmax_resolver(), TensorArena::<64>::new());
        let err = interpreter.allocate_tensors().unwrap_err();
        assert_eq!(err, RuntimeError::Model(ModelError::UnknownElementType { code: 99 }));
    }
}
