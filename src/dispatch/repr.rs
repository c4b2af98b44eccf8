//! Detection containers accepted by the dispatch entry points.

use crate::util::Element;
use ndarray::{Array2, ArrayView2};
use std::sync::Arc;

/// Where a detection buffer lives, which decides the execution kernel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Device {
    /// Host memory; runs the scalar kernel.
    #[default]
    Host,
    /// Accelerator with the given ordinal; runs the parallel kernel.
    Accelerator(usize),
}

/// Reference-counted detection buffer tagged with its device.
#[derive(Clone, Debug, PartialEq)]
pub struct Tensor<T> {
    data: Arc<Array2<T>>,
    device: Device,
}

impl<T: Element> Tensor<T> {
    /// Wraps an owned array.
    pub fn new(data: Array2<T>, device: Device) -> Self {
        Self::from_shared(Arc::new(data), device)
    }

    /// Wraps an already shared buffer without copying it.
    pub fn from_shared(data: Arc<Array2<T>>, device: Device) -> Self {
        Self { data, device }
    }

    /// Device the buffer lives on.
    pub fn device(&self) -> Device {
        self.device
    }

    /// Borrowed view of the rows.
    pub fn view(&self) -> ArrayView2<'_, T> {
        self.data.view()
    }

    /// Unwraps the buffer, cloning only when it is still shared.
    pub fn into_array(self) -> Array2<T> {
        Arc::try_unwrap(self.data).unwrap_or_else(|shared| (*shared).clone())
    }
}

/// A candidate set as either a host array or a device-tagged tensor.
///
/// Suppression results come back in the same variant; a tensor result sits
/// on the same device as its input.
#[derive(Clone, Debug, PartialEq)]
pub enum Detections<T> {
    Array(Array2<T>),
    Tensor(Tensor<T>),
}

impl<T: Element> Detections<T> {
    /// Borrowed view of the rows, whatever the container.
    pub fn view(&self) -> ArrayView2<'_, T> {
        match self {
            Detections::Array(array) => array.view(),
            Detections::Tensor(tensor) => tensor.view(),
        }
    }

    /// Number of candidates.
    pub fn nrows(&self) -> usize {
        self.view().nrows()
    }

    /// Returns true when there are no candidates.
    pub fn is_empty(&self) -> bool {
        self.nrows() == 0
    }

    /// Device the candidates run on.
    ///
    /// Tensors report their own device. Arrays are host-resident unless
    /// `device_id` places them on an accelerator.
    pub fn residency(&self, device_id: Option<usize>) -> Device {
        match self {
            Detections::Array(_) => device_id.map_or(Device::Host, Device::Accelerator),
            Detections::Tensor(tensor) => tensor.device(),
        }
    }

    /// Consumes the container and returns its rows.
    pub fn into_array(self) -> Array2<T> {
        match self {
            Detections::Array(array) => array,
            Detections::Tensor(tensor) => tensor.into_array(),
        }
    }

    /// Wraps `rows` in the same container family, on the same device.
    pub(crate) fn like(&self, rows: Array2<T>) -> Self {
        match self {
            Detections::Array(_) => Detections::Array(rows),
            Detections::Tensor(tensor) => Detections::Tensor(Tensor::new(rows, tensor.device())),
        }
    }
}

impl<T> From<Array2<T>> for Detections<T> {
    fn from(array: Array2<T>) -> Self {
        Detections::Array(array)
    }
}

impl<T> From<Tensor<T>> for Detections<T> {
    fn from(tensor: Tensor<T>) -> Self {
        Detections::Tensor(tensor)
    }
}
