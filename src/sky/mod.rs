//! The sky: every geometry group of one pipeline run
//!
//! A [`Sky`] owns its stars, constellation lines, grid and boundary and
//! moves them through filter → densify → project → normalize. Each stage
//! takes the sky by value and hands it back, so no caller can hold a
//! reference to geometry that a later stage rewrites in place.
//!
//! Stages may be called in any order, but only the documented one is
//! meaningful: filtering after projection compares planar coordinates
//! against an angular boundary. Out-of-order calls are logged.

pub mod filter;
pub mod grid;
pub mod stats;

use std::fmt;

use log::{debug, warn};

use crate::domain::Star;
use crate::error::GeometryResult;
use crate::geometry::{
    Extents, Geometry, MultiPolyline, Normalizer, Point, Polyline, StereographicProjector,
};

pub use filter::RegionFilter;
pub use grid::{GridStyle, build_grid};
pub use stats::SkyStats;

/// Pipeline progress, in documented order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Stage {
    #[default]
    Raw,
    Filtered,
    Densified,
    Projected,
    Normalized,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Raw => "raw",
            Stage::Filtered => "filter",
            Stage::Densified => "densify",
            Stage::Projected => "project",
            Stage::Normalized => "normalize",
        };
        f.write_str(name)
    }
}

/// Names of the groups a sky holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupKey {
    Stars,
    Constellations,
    Grid,
    Boundary,
}

/// Read access to one group, tagged by its shape
#[derive(Debug, Clone, Copy)]
pub enum GroupRef<'a> {
    PointSet(&'a [Star]),
    LineGroupSet(&'a [MultiPolyline]),
    SingleLine(&'a Polyline),
}

impl GroupRef<'_> {
    pub fn extents(&self) -> Option<Extents> {
        match self {
            GroupRef::PointSet(stars) => stars.extents(),
            GroupRef::LineGroupSet(groups) => groups.extents(),
            GroupRef::SingleLine(line) => line.extents(),
        }
    }
}

/// Write access to one group, tagged by its shape
#[derive(Debug)]
pub enum GroupMut<'a> {
    PointSet(&'a mut [Star]),
    LineGroupSet(&'a mut [MultiPolyline]),
    SingleLine(&'a mut Polyline),
}

impl Geometry for GroupMut<'_> {
    fn try_map_points<E, F>(&mut self, f: &mut F) -> Result<(), E>
    where
        F: FnMut(Point) -> Result<Point, E>,
    {
        match self {
            GroupMut::PointSet(stars) => stars.try_map_points(f),
            GroupMut::LineGroupSet(groups) => groups.try_map_points(f),
            GroupMut::SingleLine(line) => line.try_map_points(f),
        }
    }

    fn for_each_point<F: FnMut(Point)>(&self, f: &mut F) {
        match self {
            GroupMut::PointSet(stars) => stars.for_each_point(f),
            GroupMut::LineGroupSet(groups) => groups.for_each_point(f),
            GroupMut::SingleLine(line) => line.for_each_point(f),
        }
    }
}

/// Which geometry sets the normalization frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    /// One named group
    Group(GroupKey),
    /// Every group together
    Everything,
}

/// Container for all geometry groups of one pipeline run
#[derive(Debug, Clone, Default)]
pub struct Sky {
    name: Option<String>,
    stars: Option<Vec<Star>>,
    constellations: Option<Vec<MultiPolyline>>,
    grid: Option<MultiPolyline>,
    boundary: Option<Polyline>,
    stage: Stage,
}

impl Sky {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_stars(mut self, stars: Vec<Star>) -> Self {
        self.stars = Some(stars);
        self
    }

    pub fn with_constellations(mut self, constellations: Vec<MultiPolyline>) -> Self {
        self.constellations = Some(constellations);
        self
    }

    pub fn with_grid(mut self, grid: MultiPolyline) -> Self {
        self.grid = Some(grid);
        self
    }

    pub fn with_boundary(mut self, boundary: Polyline) -> Self {
        self.boundary = Some(boundary);
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn stars(&self) -> Option<&[Star]> {
        self.stars.as_deref()
    }

    pub fn constellations(&self) -> Option<&[MultiPolyline]> {
        self.constellations.as_deref()
    }

    pub fn grid(&self) -> Option<&MultiPolyline> {
        self.grid.as_ref()
    }

    pub fn boundary(&self) -> Option<&Polyline> {
        self.boundary.as_ref()
    }

    /// Furthest stage reached so far
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Every present group, in a fixed order
    pub fn groups(&self) -> Vec<(GroupKey, GroupRef<'_>)> {
        let mut groups = Vec::with_capacity(4);
        if let Some(stars) = &self.stars {
            groups.push((GroupKey::Stars, GroupRef::PointSet(stars.as_slice())));
        }
        if let Some(constellations) = &self.constellations {
            groups.push((
                GroupKey::Constellations,
                GroupRef::LineGroupSet(constellations.as_slice()),
            ));
        }
        if let Some(grid) = &self.grid {
            groups.push((
                GroupKey::Grid,
                GroupRef::LineGroupSet(std::slice::from_ref(grid)),
            ));
        }
        if let Some(boundary) = &self.boundary {
            groups.push((GroupKey::Boundary, GroupRef::SingleLine(boundary)));
        }
        groups
    }

    pub fn group(&self, key: GroupKey) -> Option<GroupRef<'_>> {
        self.groups()
            .into_iter()
            .find_map(|(k, group)| (k == key).then_some(group))
    }

    fn groups_mut(&mut self) -> Vec<GroupMut<'_>> {
        let mut groups = Vec::with_capacity(4);
        if let Some(stars) = &mut self.stars {
            groups.push(GroupMut::PointSet(stars.as_mut_slice()));
        }
        if let Some(constellations) = &mut self.constellations {
            groups.push(GroupMut::LineGroupSet(constellations.as_mut_slice()));
        }
        if let Some(grid) = &mut self.grid {
            groups.push(GroupMut::LineGroupSet(std::slice::from_mut(grid)));
        }
        if let Some(boundary) = &mut self.boundary {
            groups.push(GroupMut::SingleLine(boundary));
        }
        groups
    }

    /// Extents of every group together
    pub fn extents(&self) -> Option<Extents> {
        Extents::merge(self.groups().iter().map(|(_, g)| g.extents()))
    }

    fn advance(&mut self, next: Stage) {
        if next < self.stage {
            warn!(
                "{} requested after {}; the pipeline order is filter, densify, project, normalize",
                next, self.stage
            );
        }
        self.stage = self.stage.max(next);
    }

    /// Keep only what lies inside the filter's boundary
    ///
    /// Stars must also pass the optional attribute ranges. Constellation and
    /// grid lines lose their outside vertices; lines left empty are dropped,
    /// then collections left empty. The boundary becomes the sky's region.
    /// An unclosed boundary contains nothing, so it removes every star and
    /// line.
    pub fn filter(mut self, filter: RegionFilter) -> Self {
        self.advance(Stage::Filtered);

        let RegionFilter {
            boundary,
            magnitudes,
            color_indices,
        } = filter;

        if !boundary.is_closed() {
            warn!(
                "Filter boundary with {} vertices is not closed; nothing will be kept",
                boundary.len()
            );
        }

        if let Some(stars) = &mut self.stars {
            let before = stars.len();
            stars.retain(|s| s.matches(&boundary, magnitudes, color_indices));
            debug!("Filter kept {} of {} stars", stars.len(), before);
        }

        if let Some(constellations) = &mut self.constellations {
            let before = constellations.len();
            for constellation in constellations.iter_mut() {
                constellation.retain_inside(&boundary);
            }
            constellations.retain(MultiPolyline::is_populated);
            debug!(
                "Filter kept {} of {} constellations",
                constellations.len(),
                before
            );
        }

        if let Some(grid) = &mut self.grid {
            grid.retain_inside(&boundary);
            debug!("Filter kept {} grid lines", grid.polylines().len());
        }
        self.grid = self.grid.take().filter(MultiPolyline::is_populated);

        self.boundary = Some(boundary);
        self
    }

    /// Densify constellation lines, grid and boundary
    ///
    /// `density` is the wanted number of vertices per unit length.
    ///
    /// # Errors
    /// * `DensityOverflow` if a segment would need more points than
    ///   [`MAX_SEGMENT_POINTS`](crate::geometry::densify::MAX_SEGMENT_POINTS)
    pub fn densify(mut self, density: f64) -> GeometryResult<Self> {
        self.advance(Stage::Densified);

        if let Some(constellations) = &mut self.constellations {
            for constellation in constellations.iter_mut() {
                constellation.densify(density)?;
            }
        }
        if let Some(grid) = &mut self.grid {
            grid.densify(density)?;
        }
        if let Some(boundary) = &mut self.boundary {
            boundary.densify(density)?;
        }

        debug!(
            "Densified at {} nodes per unit: {} line vertices",
            density,
            self.line_vertex_count()
        );
        Ok(self)
    }

    /// Stereographically project every coordinate of every group
    ///
    /// # Errors
    /// * `ProjectionSingularity` if any coordinate is antipodal to the centre;
    ///   the sky is consumed and no partially projected geometry escapes
    pub fn project(mut self, projector: &StereographicProjector) -> GeometryResult<Self> {
        self.advance(Stage::Projected);

        for mut group in self.groups_mut() {
            group.try_map_points(&mut |p| p.project(projector))?;
        }

        debug!(
            "Projected about ({}, {}) with radius {}",
            projector.center().lon(),
            projector.center().lat(),
            projector.radius()
        );
        Ok(self)
    }

    /// Centre and scale everything into the [-1, 1] frame
    ///
    /// Uses the boundary as reference when there is one, otherwise every
    /// group together.
    pub fn normalize(self) -> GeometryResult<Self> {
        let reference = if self.boundary.as_ref().and_then(Polyline::extents).is_some() {
            Reference::Group(GroupKey::Boundary)
        } else {
            Reference::Everything
        };
        self.normalize_with(reference)
    }

    /// Centre and scale everything into the [-1, 1] frame of `reference`
    ///
    /// One map and one centre are derived from the reference and applied to
    /// every group, so relative alignment survives. A reference without
    /// extents leaves the sky unchanged.
    ///
    /// # Errors
    /// * `DegenerateRange` if the reference has zero extent on both axes
    pub fn normalize_with(mut self, reference: Reference) -> GeometryResult<Self> {
        self.advance(Stage::Normalized);

        let extents = match reference {
            Reference::Group(key) => self.group(key).and_then(|g| g.extents()),
            Reference::Everything => self.extents(),
        };
        let Some(extents) = extents else {
            warn!("No geometry to normalize against ({:?})", reference);
            return Ok(self);
        };

        let normalizer = Normalizer::from_extents(&extents)?;
        for mut group in self.groups_mut() {
            group.map_points(|p| normalizer.normalize(p));
        }

        debug!(
            "Normalized about ({:.4}, {:.4}) with scale {:.6}",
            normalizer.centre().x,
            normalizer.centre().y,
            normalizer.scale_factor()
        );
        Ok(self)
    }

    /// Run the whole pipeline in the documented order
    pub fn process(
        self,
        filter: RegionFilter,
        density: f64,
        projector: &StereographicProjector,
    ) -> GeometryResult<Self> {
        self.filter(filter)
            .densify(density)?
            .project(projector)?
            .normalize()
    }

    fn line_vertex_count(&self) -> usize {
        let constellations: usize = self
            .constellations
            .iter()
            .flatten()
            .map(MultiPolyline::vertex_count)
            .sum();
        let grid = self.grid.as_ref().map_or(0, MultiPolyline::vertex_count);
        let boundary = self.boundary.as_ref().map_or(0, Polyline::len);
        constellations + grid + boundary
    }
}
