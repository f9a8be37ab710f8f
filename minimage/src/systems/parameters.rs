//! Parameters used to define a [`SimulationBox`](super::SimulationBox).
//!
//! A box can be described by several mutually exclusive groups of
//! parameters. In Rust code each group is a variant of [`BoxParameters`]. When
//! reading parameters from JSON, the keys are collected in [`BoxKeywords`] and
//! resolved to exactly one group.
use crate::{Error, Matrix3, Vector3D};

/// The different ways of specifying the geometry of a simulation box.
#[derive(Debug, Clone, Copy, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(try_from = "BoxKeywords", into = "BoxKeywords")]
pub enum BoxParameters {
    /// Lattice matrix, with one cell vector per row
    Vectors {
        /// the `a`, `b` and `c` vectors, as the rows of this matrix
        vects: Matrix3,
        /// position of the box origin
        origin: Vector3D,
    },
    /// Explicitly named cell vectors
    Named {
        avect: Vector3D,
        bvect: Vector3D,
        cvect: Vector3D,
        origin: Vector3D,
    },
    /// Vector lengths and angles between them (in degrees). The resulting box
    /// is normalized.
    Lengths {
        a: f64,
        b: f64,
        c: f64,
        /// angle between `b` and `c`
        alpha: f64,
        /// angle between `a` and `c`
        beta: f64,
        /// angle between `a` and `b`
        gamma: f64,
        origin: Vector3D,
    },
    /// Axis-aligned bounds and tilt factors, following LAMMPS conventions.
    /// The origin is at `(xlo, ylo, zlo)`.
    Bounds {
        xlo: f64,
        xhi: f64,
        ylo: f64,
        yhi: f64,
        zlo: f64,
        zhi: f64,
        xy: f64,
        xz: f64,
        yz: f64,
    },
    /// Edge lengths along the axes and tilt factors, following LAMMPS
    /// conventions
    Edges {
        lx: f64,
        ly: f64,
        lz: f64,
        xy: f64,
        xz: f64,
        yz: f64,
        origin: Vector3D,
    },
}

impl BoxParameters {
    /// Parameters for an orthorhombic box with the given lengths, with the
    /// origin at zero.
    pub fn orthorhombic(a: f64, b: f64, c: f64) -> BoxParameters {
        BoxParameters::Edges {
            lx: a, ly: b, lz: c,
            xy: 0.0, xz: 0.0, yz: 0.0,
            origin: Vector3D::zero(),
        }
    }

    /// Parse box parameters from a JSON object containing the keys of a single
    /// parameter group. See [`BoxKeywords`] for the list of accepted keys.
    pub fn from_json(json: &str) -> Result<BoxParameters, Error> {
        let keywords = serde_json::from_str::<BoxKeywords>(json).map_err(|error| {
            if error.is_data() {
                Error::Configuration(error.to_string())
            } else {
                Error::Json(error)
            }
        })?;

        return BoxParameters::try_from(keywords);
    }

    /// Get these parameters as a JSON string, using the keywords form
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(&BoxKeywords::from(*self))?)
    }
}

/// All the keys that can be used to define a simulation box, as they appear
/// in JSON input. Exactly one group of keys must be given:
///
/// - `vects` and optionally `origin`;
/// - `avect`, `bvect`, `cvect` and optionally `origin`;
/// - `a`, `b`, `c` and optionally `alpha`, `beta`, `gamma` (defaulting to 90°)
///   and `origin`;
/// - `xlo`, `xhi`, `ylo`, `yhi`, `zlo`, `zhi` and optionally `xy`, `xz`, `yz`
///   (defaulting to 0);
/// - `lx`, `ly`, `lz` and optionally `xy`, `xz`, `yz` and `origin`.
#[derive(Debug, Clone, Default, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct BoxKeywords {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vects: Option<[[f64; 3]; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avect: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bvect: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cvect: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beta: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gamma: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xlo: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xhi: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ylo: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yhi: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zlo: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zhi: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lx: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ly: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lz: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xz: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yz: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupKind {
    Vectors,
    Named,
    Lengths,
    Bounds,
    Edges,
}

/// A group of keys defining a simulation box
struct KeywordGroup {
    kind: GroupKind,
    name: &'static str,
    required: &'static [&'static str],
    optional: &'static [&'static str],
}

/// Optional keys shared by multiple groups, these are not enough to select a
/// group on their own.
const SHARED_KEYWORDS: &[&str] = &["origin", "xy", "xz", "yz"];

const VECTORS: KeywordGroup = KeywordGroup {
    kind: GroupKind::Vectors,
    name: "vectors",
    required: &["vects"],
    optional: &["origin"],
};

const NAMED: KeywordGroup = KeywordGroup {
    kind: GroupKind::Named,
    name: "named vectors",
    required: &["avect", "bvect", "cvect"],
    optional: &["origin"],
};

const LENGTHS: KeywordGroup = KeywordGroup {
    kind: GroupKind::Lengths,
    name: "lengths and angles",
    required: &["a", "b", "c"],
    optional: &["alpha", "beta", "gamma", "origin"],
};

const BOUNDS: KeywordGroup = KeywordGroup {
    kind: GroupKind::Bounds,
    name: "bounds",
    required: &["xlo", "xhi", "ylo", "yhi", "zlo", "zhi"],
    optional: &["xy", "xz", "yz"],
};

const EDGES: KeywordGroup = KeywordGroup {
    kind: GroupKind::Edges,
    name: "edge lengths",
    required: &["lx", "ly", "lz"],
    optional: &["xy", "xz", "yz", "origin"],
};

const ALL_GROUPS: [&KeywordGroup; 5] = [&VECTORS, &NAMED, &LENGTHS, &BOUNDS, &EDGES];

impl KeywordGroup {
    fn contains(&self, key: &str) -> bool {
        self.required.iter().chain(self.optional).any(|&name| name == key)
    }

    /// Does the presence of `key` select this group?
    fn is_selected_by(&self, key: &str) -> bool {
        self.contains(key) && !SHARED_KEYWORDS.iter().any(|&name| name == key)
    }

    fn required<T>(&self, value: Option<T>, key: &str) -> Result<T, Error> {
        value.ok_or_else(|| Error::Configuration(format!(
            "missing '{}' to define a box from {} (required keys are {})",
            key, self.name, quoted_list(self.required)
        )))
    }
}

fn quoted_list(keys: &[&str]) -> String {
    keys.iter().map(|key| format!("'{}'", key)).collect::<Vec<_>>().join(", ")
}

impl BoxKeywords {
    /// Get the names of all the keys with a value
    fn given(&self) -> Vec<&'static str> {
        let mut given = Vec::new();
        let mut check = |name: &'static str, present: bool| {
            if present {
                given.push(name);
            }
        };

        check("vects", self.vects.is_some());
        check("avect", self.avect.is_some());
        check("bvect", self.bvect.is_some());
        check("cvect", self.cvect.is_some());
        check("origin", self.origin.is_some());
        check("a", self.a.is_some());
        check("b", self.b.is_some());
        check("c", self.c.is_some());
        check("alpha", self.alpha.is_some());
        check("beta", self.beta.is_some());
        check("gamma", self.gamma.is_some());
        check("xlo", self.xlo.is_some());
        check("xhi", self.xhi.is_some());
        check("ylo", self.ylo.is_some());
        check("yhi", self.yhi.is_some());
        check("zlo", self.zlo.is_some());
        check("zhi", self.zhi.is_some());
        check("lx", self.lx.is_some());
        check("ly", self.ly.is_some());
        check("lz", self.lz.is_some());
        check("xy", self.xy.is_some());
        check("xz", self.xz.is_some());
        check("yz", self.yz.is_some());

        return given;
    }

    /// Find the single group selected by the given keys
    fn select_group(&self) -> Result<&'static KeywordGroup, Error> {
        let given = self.given();

        let selected = ALL_GROUPS.iter()
            .filter(|group| given.iter().any(|key| group.is_selected_by(key)))
            .copied()
            .collect::<Vec<_>>();

        let group = match selected.as_slice() {
            [] => {
                return Err(Error::Configuration(if given.is_empty() {
                    "no parameters given to define the box".into()
                } else {
                    format!("{} are not enough to define a box", quoted_list(&given))
                }));
            }
            [group] => *group,
            _ => {
                let names = selected.iter().map(|group| group.name).collect::<Vec<_>>();
                return Err(Error::Configuration(format!(
                    "got parameters from multiple groups ({}) in {}",
                    names.join(", "), quoted_list(&given)
                )));
            }
        };

        for key in &given {
            if !group.contains(key) {
                return Err(Error::Configuration(format!(
                    "'{}' can not be used when defining a box from {}", key, group.name
                )));
            }
        }

        return Ok(group);
    }
}

impl TryFrom<BoxKeywords> for BoxParameters {
    type Error = Error;

    fn try_from(keywords: BoxKeywords) -> Result<BoxParameters, Error> {
        let group = keywords.select_group()?;
        let origin = Vector3D::from(keywords.origin.unwrap_or_default());

        let parameters = match group.kind {
            GroupKind::Vectors => BoxParameters::Vectors {
                vects: Matrix3::from(group.required(keywords.vects, "vects")?),
                origin,
            },
            GroupKind::Named => BoxParameters::Named {
                avect: Vector3D::from(group.required(keywords.avect, "avect")?),
                bvect: Vector3D::from(group.required(keywords.bvect, "bvect")?),
                cvect: Vector3D::from(group.required(keywords.cvect, "cvect")?),
                origin,
            },
            GroupKind::Lengths => BoxParameters::Lengths {
                a: group.required(keywords.a, "a")?,
                b: group.required(keywords.b, "b")?,
                c: group.required(keywords.c, "c")?,
                alpha: keywords.alpha.unwrap_or(90.0),
                beta: keywords.beta.unwrap_or(90.0),
                gamma: keywords.gamma.unwrap_or(90.0),
                origin,
            },
            GroupKind::Bounds => BoxParameters::Bounds {
                xlo: group.required(keywords.xlo, "xlo")?,
                xhi: group.required(keywords.xhi, "xhi")?,
                ylo: group.required(keywords.ylo, "ylo")?,
                yhi: group.required(keywords.yhi, "yhi")?,
                zlo: group.required(keywords.zlo, "zlo")?,
                zhi: group.required(keywords.zhi, "zhi")?,
                xy: keywords.xy.unwrap_or(0.0),
                xz: keywords.xz.unwrap_or(0.0),
                yz: keywords.yz.unwrap_or(0.0),
            },
            GroupKind::Edges => BoxParameters::Edges {
                lx: group.required(keywords.lx, "lx")?,
                ly: group.required(keywords.ly, "ly")?,
                lz: group.required(keywords.lz, "lz")?,
                xy: keywords.xy.unwrap_or(0.0),
                xz: keywords.xz.unwrap_or(0.0),
                yz: keywords.yz.unwrap_or(0.0),
                origin,
            },
        };

        return Ok(parameters);
    }
}

impl From<BoxParameters> for BoxKeywords {
    fn from(parameters: BoxParameters) -> BoxKeywords {
        match parameters {
            BoxParameters::Vectors { vects, origin } => BoxKeywords {
                vects: Some(vects.into()),
                origin: Some(origin.into()),
                ..Default::default()
            },
            BoxParameters::Named { avect, bvect, cvect, origin } => BoxKeywords {
                avect: Some(avect.into()),
                bvect: Some(bvect.into()),
                cvect: Some(cvect.into()),
                origin: Some(origin.into()),
                ..Default::default()
            },
            BoxParameters::Lengths { a, b, c, alpha, beta, gamma, origin } => BoxKeywords {
                a: Some(a),
                b: Some(b),
                c: Some(c),
                alpha: Some(alpha),
                beta: Some(beta),
                gamma: Some(gamma),
                origin: Some(origin.into()),
                ..Default::default()
            },
            BoxParameters::Bounds { xlo, xhi, ylo, yhi, zlo, zhi, xy, xz, yz } => BoxKeywords {
                xlo: Some(xlo),
                xhi: Some(xhi),
                ylo: Some(ylo),
                yhi: Some(yhi),
                zlo: Some(zlo),
                zhi: Some(zhi),
                xy: Some(xy),
                xz: Some(xz),
                yz: Some(yz),
                ..Default::default()
            },
            BoxParameters::Edges { lx, ly, lz, xy, xz, yz, origin } => BoxKeywords {
                lx: Some(lx),
                ly: Some(ly),
                lz: Some(lz),
                xy: Some(xy),
                xz: Some(xz),
                yz: Some(yz),
                origin: Some(origin.into()),
                ..Default::default()
            },
        }
    }
}

// The JSON representation of `BoxParameters` is the keywords form
impl schemars::JsonSchema for BoxParameters {
    fn schema_name() -> String {
        "BoxParameters".into()
    }

    fn json_schema(gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        BoxKeywords::json_schema(gen)
    }
}
