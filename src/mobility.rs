use crate::StrError;
use russell_lab::Vector;
use serde::{Deserialize, Serialize};

/// Defines the mobility function of a two-phase (water/oil) flow
///
/// Mobility is the relative permeability of a phase divided by its viscosity.
pub trait Mobility {
    /// Calculates the water and oil mobilities `(mw, mo)` corresponding to the water saturation `s`
    ///
    /// The output vectors have the same length as `s`.
    fn calc(&self, s: &Vector) -> Result<(Vector, Vector), StrError>;
}

/// Implements the quadratic (Corey-type) mobility model
///
/// ```text
/// sn = (s - swir) / (1 - swir - soir)    clipped to [0, 1]
/// mw = sn² / vw
/// mo = (1 - sn)² / vo
/// ```
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ModelQuadratic {
    vw: f64,   // water viscosity
    vo: f64,   // oil viscosity
    swir: f64, // irreducible water saturation
    soir: f64, // irreducible oil saturation
}

impl ModelQuadratic {
    /// Allocates a new instance
    pub fn new(vw: f64, vo: f64, swir: f64, soir: f64) -> Result<Self, StrError> {
        let model = ModelQuadratic { vw, vo, swir, soir };
        model.validate()?;
        Ok(model)
    }

    /// Checks the parameters (e.g., after deserialization)
    pub fn validate(&self) -> Result<(), StrError> {
        if self.vw <= 0.0 || self.vo <= 0.0 {
            return Err("viscosities of the quadratic mobility model must be > 0.0");
        }
        if self.swir < 0.0 || self.soir < 0.0 {
            return Err("irreducible saturations of the quadratic mobility model must be ≥ 0.0");
        }
        if self.swir + self.soir >= 1.0 {
            return Err("swir + soir of the quadratic mobility model must be < 1.0");
        }
        Ok(())
    }
}

impl Mobility for ModelQuadratic {
    fn calc(&self, s: &Vector) -> Result<(Vector, Vector), StrError> {
        let n = s.dim();
        let mut mw = Vector::new(n);
        let mut mo = Vector::new(n);
        let den = 1.0 - self.swir - self.soir;
        for i in 0..n {
            let sn = f64::min(f64::max((s[i] - self.swir) / den, 0.0), 1.0);
            mw[i] = sn * sn / self.vw;
            mo[i] = (1.0 - sn) * (1.0 - sn) / self.vo;
        }
        Ok((mw, mo))
    }
}

/// Implements saturation-independent mobilities
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConstant {
    mw: f64, // water mobility
    mo: f64, // oil mobility
}

impl ModelConstant {
    /// Allocates a new instance
    pub fn new(mw: f64, mo: f64) -> Result<Self, StrError> {
        let model = ModelConstant { mw, mo };
        model.validate()?;
        Ok(model)
    }

    /// Checks the parameters (e.g., after deserialization)
    pub fn validate(&self) -> Result<(), StrError> {
        if self.mw < 0.0 || self.mo < 0.0 {
            return Err("constant mobilities must be ≥ 0.0");
        }
        if self.mw + self.mo <= 0.0 {
            return Err("total constant mobility must be > 0.0");
        }
        Ok(())
    }
}

impl Mobility for ModelConstant {
    fn calc(&self, s: &Vector) -> Result<(Vector, Vector), StrError> {
        Ok((Vector::filled(s.dim(), self.mw), Vector::filled(s.dim(), self.mo)))
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
