//! Owned model handles and the queries they answer.
//!
//! A [`Model`] frees its native handle exactly once. Typed getters map
//! straight onto the library's scalar accessors; [`Model::get_value`] hands
//! the root value node to the decoder.

use num_bigint::BigInt;
use num_rational::BigRational;
use yices_native::{GenMode, Term, Yval, YicesApi};

use crate::boundary::{check_handle, check_status, check_term, check_truth};
use crate::config::DecodeConfig;
use crate::decode::Decoder;
use crate::error::Result;
use crate::value::Value;
use crate::vector::TermVec;

/// A model owned by this binding.
///
/// Wraps one native model handle and frees it exactly once, either through
/// [`Model::dispose`] or when the value is dropped. Every query borrows the
/// model, so no decoded node can outlive it.
pub struct Model<'a, A: YicesApi> {
    api: &'a A,
    raw: A::Model,
    config: DecodeConfig,
}

impl<'a, A: YicesApi> Model<'a, A> {
    /// Extract the model of a context whose last check was satisfiable.
    ///
    /// With `keep_subst` set, variables eliminated by the solver's
    /// simplifications keep their substituted values in the model.
    pub fn from_context(api: &'a A, ctx: A::Context, keep_subst: bool) -> Result<Self> {
        let raw = check_handle(api, api.get_model(ctx, keep_subst), "yices_get_model")?;
        tracing::debug!(keep_subst, "model extracted from context");
        Ok(Self::wrap(api, raw))
    }

    /// Build a model assigning each variable the constant paired with it.
    ///
    /// Pairs are passed to the library in iteration order. Duplicate or
    /// non-variable keys are rejected by the library.
    pub fn from_map(api: &'a A, pairs: impl IntoIterator<Item = (Term, Term)>) -> Result<Self> {
        let (vars, values): (Vec<Term>, Vec<Term>) = pairs.into_iter().unzip();
        let raw = check_handle(
            api,
            api.model_from_map(&vars, &values),
            "yices_model_from_map",
        )?;
        tracing::debug!(assignments = vars.len(), "model built from map");
        Ok(Self::wrap(api, raw))
    }

    fn wrap(api: &'a A, raw: A::Model) -> Self {
        Self {
            api,
            raw,
            config: DecodeConfig::default(),
        }
    }

    /// Replace the decoding settings. An invalid config leaves the current
    /// one in place.
    pub fn set_config(&mut self, config: DecodeConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    /// The native handle. Valid for as long as `self` is.
    pub fn raw(&self) -> A::Model {
        self.raw
    }

    pub fn api(&self) -> &'a A {
        self.api
    }

    // ---- typed extraction ----

    pub fn get_bool_value(&self, t: Term) -> Result<bool> {
        let mut val = 0;
        check_status(
            self.api,
            self.api.get_bool_value(self.raw, t, &mut val),
            "yices_get_bool_value",
        )?;
        Ok(val != 0)
    }

    pub fn get_integer_value(&self, t: Term) -> Result<i64> {
        let mut val = 0i64;
        check_status(
            self.api,
            self.api.get_int64_value(self.raw, t, &mut val),
            "yices_get_int64_value",
        )?;
        Ok(val)
    }

    /// The value of `t` as the library's 64-bit fraction, not reduced.
    pub fn get_fraction_value(&self, t: Term) -> Result<BigRational> {
        let mut num = 0i64;
        let mut den = 0u64;
        check_status(
            self.api,
            self.api.get_rational64_value(self.raw, t, &mut num, &mut den),
            "yices_get_rational64_value",
        )?;
        Ok(BigRational::new_raw(BigInt::from(num), BigInt::from(den)))
    }

    pub fn get_float_value(&self, t: Term) -> Result<f64> {
        let mut val = 0.0f64;
        check_status(
            self.api,
            self.api.get_double_value(self.raw, t, &mut val),
            "yices_get_double_value",
        )?;
        Ok(val)
    }

    /// Index of the value of `t` within its scalar type.
    pub fn get_scalar_value(&self, t: Term) -> Result<i32> {
        let mut val = 0;
        check_status(
            self.api,
            self.api.get_scalar_value(self.raw, t, &mut val),
            "yices_get_scalar_value",
        )?;
        Ok(val)
    }

    // ---- generic values ----

    /// Decode the full value of `t`.
    pub fn get_value(&self, t: Term) -> Result<Value> {
        let mut root = Yval::default();
        check_status(
            self.api,
            self.api.get_value(self.raw, t, &mut root),
            "yices_get_value",
        )?;
        Decoder::new(self.api, self.raw, self.config.max_depth).decode(&root)
    }

    /// The value of `t` as a constant term.
    pub fn get_value_as_term(&self, t: Term) -> Result<Term> {
        check_term(
            self.api,
            self.api.get_value_as_term(self.raw, t),
            "yices_get_value_as_term",
        )
    }

    // ---- evaluation ----

    pub fn formula_true_in_model(&self, f: Term) -> Result<bool> {
        check_truth(
            self.api,
            self.api.formula_true_in_model(self.raw, f),
            "yices_formula_true_in_model",
        )
    }

    /// Whether the conjunction of `fs` holds.
    pub fn formulas_true_in_model(&self, fs: &[Term]) -> Result<bool> {
        check_truth(
            self.api,
            self.api.formulas_true_in_model(self.raw, fs),
            "yices_formulas_true_in_model",
        )
    }

    // ---- derived term sets ----

    /// Every term the model assigns a value to, in the library's order.
    pub fn collect_defined_terms(&self) -> Vec<Term> {
        let mut v = TermVec::new(self.api);
        self.api.model_collect_defined_terms(self.raw, v.raw_mut());
        v.into_vec()
    }

    pub fn implicant_for_formula(&self, t: Term) -> Result<Vec<Term>> {
        let mut v = TermVec::new(self.api);
        check_status(
            self.api,
            self.api.implicant_for_formula(self.raw, t, v.raw_mut()),
            "yices_implicant_for_formula",
        )?;
        Ok(v.into_vec())
    }

    pub fn implicant_for_formulas(&self, fs: &[Term]) -> Result<Vec<Term>> {
        let mut v = TermVec::new(self.api);
        check_status(
            self.api,
            self.api.implicant_for_formulas(self.raw, fs, v.raw_mut()),
            "yices_implicant_for_formulas",
        )?;
        Ok(v.into_vec())
    }

    /// Generalize the model for `t`, eliminating the variables in `elims`.
    pub fn generalize_model(&self, t: Term, elims: &[Term], mode: GenMode) -> Result<Vec<Term>> {
        let mut v = TermVec::new(self.api);
        check_status(
            self.api,
            self.api.generalize_model(self.raw, t, elims, mode, v.raw_mut()),
            "yices_generalize_model",
        )?;
        Ok(v.into_vec())
    }

    /// Same as [`Model::generalize_model`] for the conjunction of `fs`.
    pub fn generalize_model_array(
        &self,
        fs: &[Term],
        elims: &[Term],
        mode: GenMode,
    ) -> Result<Vec<Term>> {
        let mut v = TermVec::new(self.api);
        check_status(
            self.api,
            self.api
                .generalize_model_array(self.raw, fs, elims, mode, v.raw_mut()),
            "yices_generalize_model_array",
        )?;
        Ok(v.into_vec())
    }

    /// Free the native model now.
    pub fn dispose(self) {
        drop(self);
    }
}

impl<A: YicesApi> Drop for Model<'_, A> {
    fn drop(&mut self) {
        tracing::debug!("freeing model");
        self.api.free_model(self.raw);
    }
}

impl<A: YicesApi> std::fmt::Debug for Model<'_, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
