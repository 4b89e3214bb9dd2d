//! Scoped ownership of native term and value-node vectors.
//!
//! A guard initializes its vector on construction and deletes it on drop,
//! so every exit path (including `?` on an error) releases the vector
//! exactly once.

use yices_native::{Term, Yval, YicesApi};

/// An initialized `term_vector_t`, deleted on drop.
pub(crate) struct TermVec<'a, A: YicesApi + ?Sized> {
    api: &'a A,
    raw: A::TermVector,
}

impl<'a, A: YicesApi + ?Sized> TermVec<'a, A> {
    pub(crate) fn new(api: &'a A) -> Self {
        Self {
            raw: api.init_term_vector(),
            api,
        }
    }

    pub(crate) fn raw_mut(&mut self) -> &mut A::TermVector {
        &mut self.raw
    }

    pub(crate) fn as_slice(&self) -> &[Term] {
        self.api.term_vector_elems(&self.raw)
    }

    /// Copy the contents out and release the vector.
    pub(crate) fn into_vec(self) -> Vec<Term> {
        self.as_slice().to_vec()
    }
}

impl<A: YicesApi + ?Sized> Drop for TermVec<'_, A> {
    fn drop(&mut self) {
        self.api.delete_term_vector(&mut self.raw);
    }
}

/// An initialized `yval_vector_t`, deleted on drop.
pub(crate) struct YvalVec<'a, A: YicesApi + ?Sized> {
    api: &'a A,
    raw: A::YvalVector,
}

impl<'a, A: YicesApi + ?Sized> YvalVec<'a, A> {
    pub(crate) fn new(api: &'a A) -> Self {
        Self {
            raw: api.init_yval_vector(),
            api,
        }
    }

    pub(crate) fn raw_mut(&mut self) -> &mut A::YvalVector {
        &mut self.raw
    }

    pub(crate) fn as_slice(&self) -> &[Yval] {
        self.api.yval_vector_elems(&self.raw)
    }
}

impl<A: YicesApi + ?Sized> Drop for YvalVec<'_, A> {
    fn drop(&mut self) {
        self.api.delete_yval_vector(&mut self.raw);
    }
}
