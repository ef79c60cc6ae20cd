use std::f64::consts::SQRT_2;

use log::debug;

pub use crate::config::*;

/// The largest distance between two points of the plane: its diagonal.
pub const MAX_DISTANCE: f64 = 2.0 * SQRT_2;

/// A position on the [-1, 1] x [-1, 1] plane.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Point {
        Point { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    fn in_bounds(&self) -> bool {
        let ok = |v: f64| v.is_finite() && (-1.0..=1.0).contains(&v);
        ok(self.x) && ok(self.y)
    }
}

/// The affinity between two points: 1 when they coincide, 0 when they are
/// at opposite corners of the plane.
pub fn affinity(a: &Point, b: &Point) -> f64 {
    ((MAX_DISTANCE - a.distance(b)) / MAX_DISTANCE).clamp(0.0, 1.0)
}

/// A builder that turns positions on the plane into voter profiles.
///
/// ```
/// use spatial_voting::builder::{Builder, Point};
/// # use spatial_voting::VotingErrors;
///
/// let mut builder = Builder::new().candidates(&[
///     ("Anna".to_string(), Point::new(-0.5, 0.0)),
///     ("Bob".to_string(), Point::new(0.5, 0.0)),
/// ])?;
///
/// builder.add_voter("v1", Point::new(0.4, 0.1))?;
/// let profiles = builder.build()?;
/// assert_eq!(profiles.candidates(), vec!["Bob".to_string(), "Anna".to_string()]);
///
/// # Ok::<(), VotingErrors>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Builder {
    pub(crate) _candidates: Vec<(CandidateId, Point)>,
    pub(crate) _voters: Vec<(VoterId, Point)>,
}

impl Builder {
    pub fn new() -> Builder {
        Builder {
            _candidates: Vec::new(),
            _voters: Vec::new(),
        }
    }

    /// Sets the candidates of the election. The voters already added are kept.
    pub fn candidates(self, cands: &[(String, Point)]) -> Result<Builder, VotingErrors> {
        let mut candidates: Vec<(CandidateId, Point)> = Vec::with_capacity(cands.len());
        for (name, pos) in cands.iter() {
            check_position(name, pos)?;
            if candidates.iter().any(|(n, _)| n == name) {
                return Err(VotingErrors::DuplicateCandidate(name.clone()));
            }
            candidates.push((name.clone(), *pos));
        }
        Ok(Builder {
            _candidates: candidates,
            _voters: self._voters,
        })
    }

    /// Adds a voter at the given position.
    pub fn add_voter(&mut self, label: &str, position: Point) -> Result<(), VotingErrors> {
        check_position(label, &position)?;
        if self._voters.iter().any(|(v, _)| v == label) {
            return Err(VotingErrors::DuplicateVoter(label.to_string()));
        }
        self._voters.push((label.to_string(), position));
        Ok(())
    }

    /// Computes the profile of every voter, closest candidates first.
    pub fn build(&self) -> Result<Profiles, VotingErrors> {
        let mut profiles = Profiles::new();
        for (voter, vpos) in self._voters.iter() {
            let pairs: Vec<(&str, f64)> = self
                ._candidates
                .iter()
                .map(|(c, cpos)| (c.as_str(), affinity(vpos, cpos)))
                .collect();
            let profile = Profile::new(&pairs)?;
            debug!("build: voter {}: {:?}", voter, profile);
            profiles.insert(voter, profile)?;
        }
        Ok(profiles)
    }
}

fn check_position(label: &str, pos: &Point) -> Result<(), VotingErrors> {
    if pos.in_bounds() {
        Ok(())
    } else {
        Err(VotingErrors::OutOfBounds {
            label: label.to_string(),
            x: pos.x,
            y: pos.y,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cand(name: &str, x: f64, y: f64) -> (String, Point) {
        (name.to_string(), Point::new(x, y))
    }

    #[test]
    fn affinity_bounds() {
        let p = Point::new(0.3, -0.2);
        assert_eq!(affinity(&p, &p), 1.0);
        let corner = affinity(&Point::new(-1.0, -1.0), &Point::new(1.0, 1.0));
        assert!(corner.abs() < 1e-12);
        let half = affinity(&Point::new(0.0, 0.0), &Point::new(1.0, 1.0));
        assert!((half - 0.5).abs() < 1e-12);
    }

    #[test]
    fn closest_candidate_first() -> Result<(), VotingErrors> {
        let mut builder = Builder::new().candidates(&[
            cand("A", -0.8, 0.0),
            cand("B", 0.0, 0.0),
            cand("C", 0.8, 0.0),
        ])?;
        builder.add_voter("v1", Point::new(0.7, 0.1))?;
        builder.add_voter("v2", Point::new(-0.1, 0.0))?;
        let profiles = builder.build()?;

        assert_eq!(profiles.len(), 2);
        let order = |v: &str| -> Vec<String> {
            profiles
                .get(v)
                .map(|p| p.candidates().map(|c| c.to_string()).collect())
                .unwrap_or_default()
        };
        assert_eq!(order("v1"), vec!["C", "B", "A"]);
        assert_eq!(order("v2"), vec!["B", "A", "C"]);
        Ok(())
    }

    #[test]
    fn equidistant_candidates_keep_declaration_order() -> Result<(), VotingErrors> {
        let mut builder =
            Builder::new().candidates(&[cand("Z", 0.5, 0.0), cand("Y", -0.5, 0.0)])?;
        builder.add_voter("v", Point::new(0.0, 0.3))?;
        let profiles = builder.build()?;
        assert_eq!(profiles.candidates(), vec!["Z", "Y"]);
        Ok(())
    }

    #[test]
    fn out_of_bounds() {
        let res = Builder::new().candidates(&[cand("A", 1.5, 0.0)]);
        assert!(matches!(res, Err(VotingErrors::OutOfBounds { .. })));

        let mut builder = Builder::new();
        assert!(builder.add_voter("v", Point::new(0.0, f64::NAN)).is_err());
        assert!(builder.add_voter("w", Point::new(-1.0, 1.0)).is_ok());
    }

    #[test]
    fn duplicates() {
        let res = Builder::new().candidates(&[cand("A", 0.0, 0.0), cand("A", 0.1, 0.0)]);
        assert_eq!(res.err(), Some(VotingErrors::DuplicateCandidate("A".to_string())));

        let mut builder = Builder::new();
        assert!(builder.add_voter("v", Point::new(0.0, 0.0)).is_ok());
        assert_eq!(
            builder.add_voter("v", Point::new(0.1, 0.0)),
            Err(VotingErrors::DuplicateVoter("v".to_string()))
        );
    }
}
