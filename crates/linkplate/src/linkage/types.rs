//! Linkage description (authoring/serialized form) and its compiled index form.
//!
//! - `Linkage`: named parameters, ordered joints and the fresh-name counter.
//!   Field names and joint tags are stable; this is the persisted shape.
//! - `Mechanism`: arena view of a linkage with `PointId` handles and resolved
//!   parameter values. The name lookup lives here and nowhere further down.
//! - `Pose`: evaluated positions for one drive angle, indexed by `PointId`.

use std::collections::{BTreeMap, HashMap};

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geom2::xy;

/// A named linkage parameter: a ground/offset coordinate or a scalar length/angle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Param {
    Point(#[serde(with = "xy")] Vector2<f64>),
    Scalar(f64),
}

impl Param {
    #[inline]
    pub fn as_point(&self) -> Option<Vector2<f64>> {
        match *self {
            Param::Point(p) => Some(p),
            Param::Scalar(_) => None,
        }
    }

    #[inline]
    pub fn as_scalar(&self) -> Option<f64> {
        match *self {
            Param::Scalar(v) => Some(v),
            Param::Point(_) => None,
        }
    }
}

/// One joint of the linkage. All fields are parameter or point names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Joint {
    /// `p1` orbits `p0` at radius `len`, offset `theta` from the drive angle.
    Rotary {
        p0: String,
        p1: String,
        len: String,
        theta: String,
    },
    /// `p2` keeps fixed distances to `p0` and `p1`, stored as the local-frame
    /// offset `pt` and reference base length `l2t`.
    Hinge {
        p0: String,
        p1: String,
        pt: String,
        l2t: String,
        p2: String,
    },
    /// `p2` sits on the ray `p0 → p1` at distance `len` from `p0`.
    Slider {
        p0: String,
        p1: String,
        len: String,
        p2: String,
    },
}

impl Joint {
    /// The point this joint defines.
    #[inline]
    pub fn output(&self) -> &str {
        match self {
            Joint::Rotary { p1, .. } => p1.as_str(),
            Joint::Hinge { p2, .. } | Joint::Slider { p2, .. } => p2.as_str(),
        }
    }

    /// Every point name the joint touches, in `p0, p1, p2` order.
    pub fn points(&self) -> Vec<&str> {
        match self {
            Joint::Rotary { p0, p1, .. } => vec![p0.as_str(), p1.as_str()],
            Joint::Hinge { p0, p1, p2, .. } | Joint::Slider { p0, p1, p2, .. } => {
                vec![p0.as_str(), p1.as_str(), p2.as_str()]
            }
        }
    }

    #[inline]
    pub fn touches(&self, name: &str) -> bool {
        self.points().contains(&name)
    }
}

/// Mutable, serializable linkage description.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Linkage {
    /// Number of names minted so far; every fresh name embeds the next value.
    pub n: u64,
    pub params: BTreeMap<String, Param>,
    pub links: Vec<Joint>,
}

impl Linkage {
    /// The authoring tool's starting linkage: a single unit crank at the origin.
    pub fn starter() -> Self {
        let mut params = BTreeMap::new();
        params.insert("p0".to_string(), Param::Point(Vector2::zeros()));
        params.insert("len2".to_string(), Param::Scalar(1.0));
        params.insert("theta2".to_string(), Param::Scalar(0.0));
        Self {
            n: 3,
            params,
            links: vec![Joint::Rotary {
                p0: "p0".into(),
                p1: "p1".into(),
                len: "len2".into(),
                theta: "theta2".into(),
            }],
        }
    }

    /// Mint a fresh name `{prefix}{n}` and advance the counter.
    pub fn mint(&mut self, prefix: &str) -> String {
        let name = format!("{prefix}{}", self.n);
        self.n += 1;
        name
    }

    /// Compile into the index form, validating declaration order and parameter kinds.
    pub fn mechanism(&self) -> Result<Mechanism> {
        Mechanism::compile(self)
    }

    pub(crate) fn scalar(&self, name: &str) -> Result<f64> {
        match self.params.get(name) {
            Some(Param::Scalar(v)) => Ok(*v),
            Some(Param::Point(_)) => Err(Error::malformed(format!(
                "parameter {name} is a coordinate, expected a scalar"
            ))),
            None => Err(Error::malformed(format!("parameter {name} is not defined"))),
        }
    }

    pub(crate) fn point(&self, name: &str) -> Result<Vector2<f64>> {
        match self.params.get(name) {
            Some(Param::Point(p)) => Ok(*p),
            Some(Param::Scalar(_)) => Err(Error::malformed(format!(
                "parameter {name} is a scalar, expected a coordinate"
            ))),
            None => Err(Error::malformed(format!("parameter {name} is not defined"))),
        }
    }
}

/// Handle of a point inside a `Mechanism` (first-appearance order over the joints).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointId(pub usize);

/// A joint resolved to handles and parameter values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Step {
    Rotary {
        p0: PointId,
        p1: PointId,
        len: f64,
        theta: f64,
    },
    Hinge {
        p0: PointId,
        p1: PointId,
        pt: Vector2<f64>,
        l2t: f64,
        p2: PointId,
    },
    Slider {
        p0: PointId,
        p1: PointId,
        len: f64,
        p2: PointId,
    },
}

/// Compiled linkage: index-stable points, ground seeds and ordered steps.
#[derive(Clone, Debug)]
pub struct Mechanism {
    names: Vec<String>,
    index: HashMap<String, PointId>,
    ground: Vec<(PointId, Vector2<f64>)>,
    is_ground: Vec<bool>,
    steps: Vec<Step>,
}

impl Mechanism {
    fn compile(linkage: &Linkage) -> Result<Self> {
        let mut m = Mechanism {
            names: Vec::new(),
            index: HashMap::new(),
            ground: Vec::new(),
            is_ground: Vec::new(),
            steps: Vec::with_capacity(linkage.links.len()),
        };
        for link in &linkage.links {
            let step = match link {
                Joint::Rotary { p0, p1, len, theta } => {
                    let p0 = m.resolve_input(linkage, p0)?;
                    let p1 = m.define_output(linkage, p1)?;
                    Step::Rotary {
                        p0,
                        p1,
                        len: linkage.scalar(len)?,
                        theta: linkage.scalar(theta)?,
                    }
                }
                Joint::Hinge {
                    p0,
                    p1,
                    pt,
                    l2t,
                    p2,
                } => {
                    let p0 = m.resolve_input(linkage, p0)?;
                    let p1 = m.resolve_input(linkage, p1)?;
                    let p2 = m.define_output(linkage, p2)?;
                    Step::Hinge {
                        p0,
                        p1,
                        pt: linkage.point(pt)?,
                        l2t: linkage.scalar(l2t)?,
                        p2,
                    }
                }
                Joint::Slider { p0, p1, len, p2 } => {
                    let p0 = m.resolve_input(linkage, p0)?;
                    let p1 = m.resolve_input(linkage, p1)?;
                    let p2 = m.define_output(linkage, p2)?;
                    Step::Slider {
                        p0,
                        p1,
                        len: linkage.scalar(len)?,
                        p2,
                    }
                }
            };
            m.steps.push(step);
        }
        Ok(m)
    }

    fn push(&mut self, name: &str, ground: Option<Vector2<f64>>) -> PointId {
        let id = PointId(self.names.len());
        self.names.push(name.to_string());
        self.index.insert(name.to_string(), id);
        self.is_ground.push(ground.is_some());
        if let Some(p) = ground {
            self.ground.push((id, p));
        }
        id
    }

    fn resolve_input(&mut self, linkage: &Linkage, name: &str) -> Result<PointId> {
        if let Some(&id) = self.index.get(name) {
            return Ok(id);
        }
        match linkage.params.get(name) {
            Some(Param::Point(p)) => Ok(self.push(name, Some(*p))),
            Some(Param::Scalar(_)) => Err(Error::malformed(format!(
                "point {name} refers to a scalar parameter"
            ))),
            None => Err(Error::malformed(format!(
                "point {name} is used before any joint defines it"
            ))),
        }
    }

    fn define_output(&mut self, linkage: &Linkage, name: &str) -> Result<PointId> {
        if self.index.contains_key(name) || linkage.params.contains_key(name) {
            return Err(Error::malformed(format!("point {name} is defined twice")));
        }
        Ok(self.push(name, None))
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    #[inline]
    pub fn id(&self, name: &str) -> Option<PointId> {
        self.index.get(name).copied()
    }

    /// Like `id`, but an unknown name is a caller error.
    pub fn require(&self, name: &str) -> Result<PointId> {
        self.id(name).ok_or_else(|| Error::unknown(name))
    }

    #[inline]
    pub fn name(&self, id: PointId) -> &str {
        &self.names[id.0]
    }

    #[inline]
    pub fn is_ground(&self, id: PointId) -> bool {
        self.is_ground[id.0]
    }

    /// Ground points and their coordinates, in discovery order.
    #[inline]
    pub fn ground(&self) -> &[(PointId, Vector2<f64>)] {
        &self.ground
    }

    #[inline]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn ids(&self) -> impl Iterator<Item = PointId> {
        (0..self.names.len()).map(PointId)
    }
}

/// Positions of every mechanism point for one drive angle.
#[derive(Clone, Debug, PartialEq)]
pub struct Pose {
    pub theta: f64,
    pub(crate) points: Vec<Vector2<f64>>,
}

impl Pose {
    #[inline]
    pub fn get(&self, id: PointId) -> Vector2<f64> {
        self.points[id.0]
    }

    #[inline]
    pub fn points(&self) -> &[Vector2<f64>] {
        &self.points
    }

    /// Name-keyed view for collaborators that address points by name.
    pub fn named(&self, mech: &Mechanism) -> BTreeMap<String, Vector2<f64>> {
        mech.ids()
            .map(|id| (mech.name(id).to_string(), self.get(id)))
            .collect()
    }
}
