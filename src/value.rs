//! Value & Variable Store (C1).
//!
//! Typed scalar and array values, assignment coercion, and per-variable
//! history. A binding's current value always equals its last history entry.

use crate::error::{StepError, StepResult};

/// Declared element type. A leading `*` marker is accepted by the parser but
/// otherwise ignored, matching the source language's pointer-in-name-only
/// quirk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarType {
    Int,
    Float,
    /// Only valid as a function's return type; never the type of a
    /// declared variable or parameter.
    Void,
}

impl VarType {
    pub fn as_str(self) -> &'static str {
        match self {
            VarType::Int => "int",
            VarType::Float => "float",
            VarType::Void => "void",
        }
    }
}

/// A scalar runtime value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
}

impl Value {
    /// Coerce this value to `ty`, truncating floats when storing into an
    /// int-typed binding.
    pub fn coerce(self, ty: VarType) -> Value {
        match (ty, self) {
            (VarType::Int, Value::Float(f)) => Value::Int(f as i64),
            (VarType::Int, Value::Int(i)) => Value::Int(i),
            (VarType::Float, Value::Int(i)) => Value::Float(i as f64),
            (VarType::Float, Value::Float(f)) => Value::Float(f),
            // Void is only ever a function's return type, never a binding's;
            // declare_scalar/declare_array never call coerce with it.
            (VarType::Void, v) => v,
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Value::Int(i) => i as f64,
            Value::Float(f) => f,
        }
    }

    pub fn add(self, other: Value, line: u32) -> StepResult<Value> {
        let _ = line;
        Ok(match (self, other) {
            (Value::Int(a), Value::Int(b)) => Value::Int(a.wrapping_add(b)),
            _ => Value::Float(self.as_f64() + other.as_f64()),
        })
    }

    pub fn sub(self, other: Value) -> Value {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Value::Int(a.wrapping_sub(b)),
            _ => Value::Float(self.as_f64() - other.as_f64()),
        }
    }

    pub fn mul(self, other: Value) -> Value {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Value::Int(a.wrapping_mul(b)),
            _ => Value::Float(self.as_f64() * other.as_f64()),
        }
    }

    /// `/` is true division (host float semantics), even for two ints; the
    /// caller truncates the result if it is stored into an int binding.
    pub fn div(self, other: Value, line: u32) -> StepResult<Value> {
        if other.as_f64() == 0.0 {
            return Err(StepError::DivisionByZero { line });
        }
        Ok(Value::Float(self.as_f64() / other.as_f64()))
    }

    pub fn lt(self, other: Value) -> bool {
        self.as_f64() < other.as_f64()
    }

    pub fn gt(self, other: Value) -> bool {
        self.as_f64() > other.as_f64()
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
        }
    }
}

/// One recorded assignment (or declaration, or increment) in a binding's
/// history. For arrays the snapshot is a deep copy of the whole array.
#[derive(Debug, Clone)]
pub enum Snapshot {
    Scalar(Option<Value>),
    Array(Vec<Option<Value>>),
}

/// A single variable binding. Bindings for the same name are kept in a
/// stack (see `VarStore`) to model nested-scope shadowing.
#[derive(Debug, Clone)]
pub struct Binding {
    pub ty: VarType,
    pub is_array: bool,
    scalar: Option<Value>,
    array: Vec<Option<Value>>,
    pub history: Vec<(u32, Snapshot)>,
}

impl Binding {
    fn new_scalar(ty: VarType, lineno: u32, value: Option<Value>) -> Self {
        let coerced = value.map(|v| v.coerce(ty));
        Binding {
            ty,
            is_array: false,
            scalar: coerced,
            array: Vec::new(),
            history: vec![(lineno, Snapshot::Scalar(coerced))],
        }
    }

    fn new_array(ty: VarType, lineno: u32, size: usize) -> Self {
        let array = vec![None; size];
        Binding {
            ty,
            is_array: true,
            scalar: None,
            array: array.clone(),
            history: vec![(lineno, Snapshot::Array(array))],
        }
    }

    pub fn scalar_value(&self) -> Option<Value> {
        self.scalar
    }

    pub fn array_len(&self) -> usize {
        self.array.len()
    }

    pub fn array_get(&self, index: usize, line: u32, name: &str) -> StepResult<Value> {
        self.array
            .get(index)
            .copied()
            .ok_or(StepError::ArrayIndexOutOfBounds {
                line,
                name: name.to_string(),
                index: index as i64,
                size: self.array.len(),
            })?
            .ok_or(StepError::UnassignedRead {
                line,
                name: format!("{}[{}]", name, index),
            })
    }

    fn assign_scalar(&mut self, value: Value, lineno: u32) {
        let coerced = value.coerce(self.ty);
        self.scalar = Some(coerced);
        self.history.push((lineno, Snapshot::Scalar(Some(coerced))));
    }

    fn assign_array_slot(&mut self, index: usize, value: Value, lineno: u32) {
        let coerced = value.coerce(self.ty);
        if index >= self.array.len() {
            self.array.resize(index + 1, None);
        }
        self.array[index] = Some(coerced);
        self.history.push((lineno, Snapshot::Array(self.array.clone())));
    }
}

/// Per-function mapping from variable name to a stack of bindings.
#[derive(Debug, Default)]
pub struct VarStore {
    bindings: std::collections::HashMap<String, Vec<Binding>>,
}

impl VarStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare_scalar(
        &mut self,
        name: &str,
        ty: VarType,
        lineno: u32,
        initial: Option<Value>,
    ) {
        self.bindings
            .entry(name.to_string())
            .or_default()
            .push(Binding::new_scalar(ty, lineno, initial));
    }

    pub fn declare_array(&mut self, name: &str, ty: VarType, lineno: u32, size: usize) {
        self.bindings
            .entry(name.to_string())
            .or_default()
            .push(Binding::new_array(ty, lineno, size));
    }

    pub fn get(&self, name: &str, line: u32) -> StepResult<&Binding> {
        self.bindings
            .get(name)
            .and_then(|stack| stack.last())
            .ok_or_else(|| StepError::UnknownVariable {
                line,
                name: name.to_string(),
            })
    }

    pub fn get_mut(&mut self, name: &str, line: u32) -> StepResult<&mut Binding> {
        self.bindings
            .get_mut(name)
            .and_then(|stack| stack.last_mut())
            .ok_or(StepError::UnknownVariable {
                line,
                name: name.to_string(),
            })
    }

    pub fn assign_scalar(&mut self, name: &str, value: Value, lineno: u32) -> StepResult<Value> {
        let binding = self.get_mut(name, lineno)?;
        binding.assign_scalar(value, lineno);
        Ok(binding.scalar_value().unwrap())
    }

    pub fn assign_array_slot(
        &mut self,
        name: &str,
        index: usize,
        value: Value,
        lineno: u32,
    ) -> StepResult<Value> {
        let binding = self.get_mut(name, lineno)?;
        binding.assign_array_slot(index, value, lineno);
        Ok(binding.array[index].unwrap())
    }

    /// `x := x + 1` (or `a[i] := a[i] + 1`), coerced like any other assign.
    pub fn increment_scalar(&mut self, name: &str, lineno: u32) -> StepResult<Value> {
        let binding = self.get_mut(name, lineno)?;
        let cur = binding.scalar_value().ok_or(StepError::UnassignedRead {
            line: lineno,
            name: name.to_string(),
        })?;
        let next = cur.add(Value::Int(1), lineno)?;
        binding.assign_scalar(next, lineno);
        Ok(binding.scalar_value().unwrap())
    }

    pub fn increment_array_slot(
        &mut self,
        name: &str,
        index: usize,
        lineno: u32,
    ) -> StepResult<Value> {
        let binding = self.get_mut(name, lineno)?;
        let cur = binding.array_get(index, lineno, name)?;
        let next = cur.add(Value::Int(1), lineno)?;
        binding.assign_array_slot(index, next, lineno);
        Ok(binding.array[index].unwrap())
    }

    /// Pop the top binding for `name`; if the stack becomes empty, drop the
    /// entry entirely.
    pub fn release(&mut self, name: &str) {
        if let Some(stack) = self.bindings.get_mut(name) {
            stack.pop();
            if stack.is_empty() {
                self.bindings.remove(name);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_binding_truncates_float_assignment() {
        let mut store = VarStore::new();
        store.declare_scalar("a", VarType::Int, 1, None);
        store.assign_scalar("a", Value::Float(3.9), 2).unwrap();
        assert_eq!(store.get("a", 2).unwrap().scalar_value(), Some(Value::Int(3)));
    }

    #[test]
    fn history_is_append_only_and_matches_current_value() {
        let mut store = VarStore::new();
        store.declare_scalar("a", VarType::Int, 1, None);
        store.assign_scalar("a", Value::Int(5), 2).unwrap();
        store.assign_scalar("a", Value::Int(6), 3).unwrap();
        let b = store.get("a", 3).unwrap();
        assert_eq!(b.history.len(), 3);
        match b.history.last().unwrap().1 {
            Snapshot::Scalar(Some(v)) => assert_eq!(v, b.scalar_value().unwrap()),
            _ => panic!("expected scalar snapshot"),
        }
    }

    #[test]
    fn shadowing_exposes_only_top_binding() {
        let mut store = VarStore::new();
        store.declare_scalar("a", VarType::Int, 1, Some(Value::Int(1)));
        store.declare_scalar("a", VarType::Int, 5, Some(Value::Int(9)));
        assert_eq!(store.get("a", 5).unwrap().scalar_value(), Some(Value::Int(9)));
        store.release("a");
        assert_eq!(store.get("a", 6).unwrap().scalar_value(), Some(Value::Int(1)));
    }

    #[test]
    fn division_by_zero_is_fatal() {
        let err = Value::Int(1).div(Value::Int(0), 7).unwrap_err();
        assert_eq!(err, StepError::DivisionByZero { line: 7 });
    }

    #[test]
    fn array_element_read_before_write_is_unassigned() {
        let mut store = VarStore::new();
        store.declare_array("a", VarType::Int, 1, 3);
        let b = store.get("a", 2).unwrap();
        let err = b.array_get(0, 2, "a").unwrap_err();
        assert_eq!(
            err,
            StepError::UnassignedRead { line: 2, name: "a[0]".into() }
        );
    }
}
