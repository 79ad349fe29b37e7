//! Vector border geometry extracted from the province raster.
//!
//! Every discontinuity between horizontally or vertically adjacent pixels
//! contributes one lattice edge; connected edges are chained into runs and
//! emitted as polylines with per-vertex tangents and normals so the renderer
//! can extrude them into constant-width anti-aliased lines. The horizontal
//! wrap seam (cylindrical topology) participates in both detection and
//! chaining.

use glam::DVec2;
use mapdata::{ProvinceId, ProvinceIdRaster, TerrainClass, TerrainTable};
use serde::{Deserialize, Serialize};

/// Category of a border, derived from the terrain of the two provinces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BorderKind {
    /// Both provinces are land.
    Land,
    /// Land on one side, water on the other.
    Coastal,
    /// Either side is impassable wasteland.
    Impassable,
    /// Open water on both sides (sea zone boundaries).
    Water,
}

impl BorderKind {
    /// Classifies a border from the terrain of its two provinces.
    pub fn between(a: TerrainClass, b: TerrainClass) -> Self {
        use TerrainClass::*;
        match (a, b) {
            (Impassable, _) | (_, Impassable) => BorderKind::Impassable,
            (Water, Water) => BorderKind::Water,
            (Land, Water) | (Water, Land) => BorderKind::Coastal,
            (Land, Land) => BorderKind::Land,
        }
    }
}

/// One polyline vertex of the border mesh.
///
/// `position` is normalized map space (0..1 per axis). `normal` is a unit
/// vector perpendicular to `tangent`, oriented away from the lower-valued
/// province, so extruding `position ± normal * width` yields a miter-joined
/// ribbon. `border_id` groups vertices of one continuous run.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable, Serialize, Deserialize)]
pub struct BorderVertex {
    pub position: [f32; 2],
    pub normal: [f32; 2],
    pub tangent: [f32; 2],
    pub border_id: u32,
}

impl BorderVertex {
    /// Expected size in bytes for GPU buffer alignment.
    pub const SIZE: usize = 28;
}

/// A contiguous vertex range belonging to one province pair.
///
/// Segments subdivide a run wherever the adjacent pair changes (runs pass
/// straight through cross junctions); shared corners are duplicated at the
/// boundary, so segment ranges never overlap and each is drawable on its
/// own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorderSegment {
    pub start_index: u32,
    pub count: u32,
    /// The two provinces this stretch separates, lower id first.
    pub provinces: [ProvinceId; 2],
    pub kind: BorderKind,
}

/// The full border mesh: one shared vertex sequence plus its segment index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BorderGeometry {
    vertices: Vec<BorderVertex>,
    segments: Vec<BorderSegment>,
    run_count: u32,
}

impl BorderGeometry {
    /// Extracts border geometry from the raster.
    ///
    /// One-shot, CPU-bound load-time pass; the result is immutable apart
    /// from [`retag`](Self::retag).
    pub fn extract(raster: &ProvinceIdRaster, classes: &TerrainTable) -> Self {
        let mut grid = EdgeGrid::scan(raster);
        let mut geometry = BorderGeometry::default();

        let (w, h) = (raster.width(), raster.height());
        for y in 0..h {
            for b in 0..w {
                let edge = Edge::V { b, y };
                if grid.present(edge) && !grid.visited(edge) {
                    geometry.emit_chain(&mut grid, edge, classes);
                }
            }
        }
        for cy in 1..h {
            for x in 0..w {
                let edge = Edge::H { x, cy };
                if grid.present(edge) && !grid.visited(edge) {
                    geometry.emit_chain(&mut grid, edge, classes);
                }
            }
        }

        log::info!(
            "Extracted {} border runs ({} segments, {} vertices) from {}x{} raster",
            geometry.run_count,
            geometry.segments.len(),
            geometry.vertices.len(),
            w,
            h
        );
        geometry
    }

    /// Rewrites every segment's `kind` from a fresh terrain table.
    ///
    /// Political redraws change which provinces count as what, never where
    /// the boundary lies, so vertices are left untouched.
    pub fn retag(&mut self, classes: &TerrainTable) {
        for segment in &mut self.segments {
            segment.kind = BorderKind::between(
                classes.class_of(segment.provinces[0]),
                classes.class_of(segment.provinces[1]),
            );
        }
    }

    pub fn vertices(&self) -> &[BorderVertex] {
        &self.vertices
    }

    pub fn segments(&self) -> &[BorderSegment] {
        &self.segments
    }

    /// Number of continuous runs (distinct `border_id` values).
    pub fn run_count(&self) -> u32 {
        self.run_count
    }

    /// Segments of one category, for per-type draw batching.
    pub fn segments_of_kind(&self, kind: BorderKind) -> impl Iterator<Item = &BorderSegment> {
        self.segments.iter().filter(move |s| s.kind == kind)
    }

    /// Raw vertex bytes for upload by the renderer.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    fn emit_chain(&mut self, grid: &mut EdgeGrid, seed: Edge, classes: &TerrainTable) {
        let chain = walk_chain(grid, seed);
        let border_id = self.run_count;
        self.run_count += 1;

        let k = chain.edges.len();
        let (w, h) = (grid.w, grid.h);

        // Corner positions in continuous (unwrapped) lattice coordinates so
        // tangents stay smooth across the wrap seam.
        let mut points = Vec::with_capacity(k + 1);
        let mut corner = chain.start;
        let mut pos = DVec2::new(f64::from(corner.0), f64::from(corner.1));
        points.push(pos);
        let mut dirs = Vec::with_capacity(k);
        for &edge in &chain.edges {
            let delta = edge.step_from(corner, w);
            corner = edge.other_corner(corner, w);
            pos += delta;
            points.push(pos);
            dirs.push(delta);
        }

        let tangent_at = |i: usize| -> DVec2 {
            if chain.is_loop && (i == 0 || i == k) {
                (dirs[k - 1] + dirs[0]).normalize()
            } else if i == 0 {
                dirs[0]
            } else if i == k {
                dirs[k - 1]
            } else {
                (dirs[i - 1] + dirs[i]).normalize()
            }
        };

        let edge_normals: Vec<DVec2> = chain.edges.iter().map(|e| grid.edge_normal(*e)).collect();
        let pairs: Vec<[ProvinceId; 2]> = chain.edges.iter().map(|e| grid.pair(*e)).collect();

        // Maximal same-pair stretches become segments; the shared corner at
        // a pair change is duplicated into both.
        let mut s = 0;
        while s < k {
            let mut e = s;
            while e + 1 < k && pairs[e + 1] == pairs[s] {
                e += 1;
            }

            let start_index = self.vertices.len() as u32;
            for vi in s..=e + 1 {
                let tangent = tangent_at(vi);
                let mut reference = DVec2::ZERO;
                if vi > s {
                    reference += edge_normals[vi - 1];
                }
                if vi <= e {
                    reference += edge_normals[vi];
                }
                if reference == DVec2::ZERO {
                    // Opposed in-group normals (checkerboard corner): fall
                    // back to the incoming edge.
                    reference = edge_normals[vi - 1];
                }
                let mut normal = DVec2::new(-tangent.y, tangent.x);
                if normal.dot(reference) < 0.0 {
                    normal = -normal;
                }

                let p = points[vi];
                let position = [
                    (p.x.rem_euclid(f64::from(w)) / f64::from(w)) as f32,
                    (p.y / f64::from(h)) as f32,
                ];
                self.vertices.push(BorderVertex {
                    position,
                    normal: [normal.x as f32, normal.y as f32],
                    tangent: [tangent.x as f32, tangent.y as f32],
                    border_id,
                });
            }

            let pair = pairs[s];
            self.segments.push(BorderSegment {
                start_index,
                count: (e + 2 - s) as u32,
                provinces: pair,
                kind: BorderKind::between(classes.class_of(pair[0]), classes.class_of(pair[1])),
            });
            s = e + 1;
        }
    }
}

/// Lattice corner: column 0..w (wrapped), row 0..=h.
type Corner = (u32, u32);

/// One unit edge of the pixel lattice separating two differing provinces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    /// Vertical edge on column boundary `b` (0 is the wrap seam), spanning
    /// corners (b, y)..(b, y+1).
    V { b: u32, y: u32 },
    /// Horizontal edge on row boundary `cy` (1..h), spanning corners
    /// (x, cy)..(x+1, cy).
    H { x: u32, cy: u32 },
}

impl Edge {
    fn corners(self, w: u32) -> [Corner; 2] {
        match self {
            Edge::V { b, y } => [(b, y), (b, y + 1)],
            Edge::H { x, cy } => [(x, cy), ((x + 1) % w, cy)],
        }
    }

    fn other_corner(self, from: Corner, w: u32) -> Corner {
        let [a, b] = self.corners(w);
        if a == from { b } else { a }
    }

    /// Walk delta when entering at `from`, in continuous coordinates.
    fn step_from(self, from: Corner, w: u32) -> DVec2 {
        let [a, _] = self.corners(w);
        match self {
            Edge::V { .. } => {
                if from == a {
                    DVec2::new(0.0, 1.0)
                } else {
                    DVec2::new(0.0, -1.0)
                }
            }
            Edge::H { .. } => {
                if from == a {
                    DVec2::new(1.0, 0.0)
                } else {
                    DVec2::new(-1.0, 0.0)
                }
            }
        }
    }

    fn is_vertical(self) -> bool {
        matches!(self, Edge::V { .. })
    }
}

/// Flat presence/visited arrays over all lattice edges of the raster.
struct EdgeGrid<'a> {
    raster: &'a ProvinceIdRaster,
    w: u32,
    h: u32,
    /// Vertical edges, indexed y * w + b.
    v_present: Vec<bool>,
    v_visited: Vec<bool>,
    /// Horizontal edges, indexed (cy - 1) * w + x.
    h_present: Vec<bool>,
    h_visited: Vec<bool>,
}

impl<'a> EdgeGrid<'a> {
    /// Scans every pixel's right and down neighbor (right wraps at the last
    /// column) and records the discontinuities.
    fn scan(raster: &'a ProvinceIdRaster) -> Self {
        let (w, h) = (raster.width(), raster.height());
        let mut v_present = vec![false; (w * h) as usize];
        let mut h_present = vec![false; (w * h.saturating_sub(1)) as usize];

        for y in 0..h {
            for b in 0..w {
                let left = raster.id_at_wrapped(i64::from(b) - 1, i64::from(y));
                let right = raster.id_at_wrapped(i64::from(b), i64::from(y));
                v_present[(y * w + b) as usize] = left != right;
            }
        }
        for cy in 1..h {
            for x in 0..w {
                let up = raster.id_at_wrapped(i64::from(x), i64::from(cy) - 1);
                let down = raster.id_at_wrapped(i64::from(x), i64::from(cy));
                h_present[((cy - 1) * w + x) as usize] = up != down;
            }
        }

        let v_visited = vec![false; v_present.len()];
        let h_visited = vec![false; h_present.len()];
        Self {
            raster,
            w,
            h,
            v_present,
            v_visited,
            h_present,
            h_visited,
        }
    }

    fn present(&self, edge: Edge) -> bool {
        match edge {
            Edge::V { b, y } => self.v_present[(y * self.w + b) as usize],
            Edge::H { x, cy } => self.h_present[((cy - 1) * self.w + x) as usize],
        }
    }

    fn visited(&self, edge: Edge) -> bool {
        match edge {
            Edge::V { b, y } => self.v_visited[(y * self.w + b) as usize],
            Edge::H { x, cy } => self.h_visited[((cy - 1) * self.w + x) as usize],
        }
    }

    fn mark(&mut self, edge: Edge) {
        match edge {
            Edge::V { b, y } => self.v_visited[(y * self.w + b) as usize] = true,
            Edge::H { x, cy } => self.h_visited[((cy - 1) * self.w + x) as usize] = true,
        }
    }

    /// The two pixels separated by the edge.
    fn sides(&self, edge: Edge) -> (ProvinceId, ProvinceId) {
        match edge {
            Edge::V { b, y } => (
                self.raster.id_at_wrapped(i64::from(b) - 1, i64::from(y)),
                self.raster.id_at_wrapped(i64::from(b), i64::from(y)),
            ),
            Edge::H { x, cy } => (
                self.raster.id_at_wrapped(i64::from(x), i64::from(cy) - 1),
                self.raster.id_at_wrapped(i64::from(x), i64::from(cy)),
            ),
        }
    }

    /// Unordered province pair, lower id first.
    fn pair(&self, edge: Edge) -> [ProvinceId; 2] {
        let (a, b) = self.sides(edge);
        if a <= b { [a, b] } else { [b, a] }
    }

    /// Unit normal of the edge, pointing away from the lower-valued side.
    fn edge_normal(&self, edge: Edge) -> DVec2 {
        let (first, second) = self.sides(edge);
        let toward_second = match edge {
            Edge::V { .. } => DVec2::new(1.0, 0.0),
            Edge::H { .. } => DVec2::new(0.0, 1.0),
        };
        if first < second {
            toward_second
        } else {
            -toward_second
        }
    }

    /// Existing edges meeting at a corner (at most four).
    fn incident(&self, corner: Corner) -> [Option<Edge>; 4] {
        let (cx, cy) = corner;
        let mut edges = [None; 4];
        if cy >= 1 {
            let e = Edge::V { b: cx, y: cy - 1 };
            if self.present(e) {
                edges[0] = Some(e);
            }
        }
        if cy < self.h {
            let e = Edge::V { b: cx, y: cy };
            if self.present(e) {
                edges[1] = Some(e);
            }
        }
        if (1..self.h).contains(&cy) {
            let e = Edge::H { x: cx, cy };
            if self.present(e) {
                edges[2] = Some(e);
            }
            let e = Edge::H {
                x: (cx + self.w - 1) % self.w,
                cy,
            };
            if self.present(e) {
                edges[3] = Some(e);
            }
        }
        edges
    }

    /// The edge a chain continues into after arriving at `corner`.
    ///
    /// Degree two continues, a four-edge cross junction passes straight
    /// through, a T junction or dead end terminates the chain.
    fn continuation(&self, corner: Corner, arrived: Edge) -> Option<Edge> {
        let incident = self.incident(corner);
        let degree = incident.iter().flatten().count();
        match degree {
            2 => incident.into_iter().flatten().find(|e| *e != arrived),
            4 => incident
                .into_iter()
                .flatten()
                .find(|e| *e != arrived && e.is_vertical() == arrived.is_vertical()),
            _ => None,
        }
    }
}

struct Chain {
    edges: Vec<Edge>,
    start: Corner,
    is_loop: bool,
}

/// Walks the maximal chain through the seed edge, marking edges visited.
///
/// Iterative in both directions; memory is bounded by the chain length, no
/// recursion over the grid.
fn walk_chain(grid: &mut EdgeGrid, seed: Edge) -> Chain {
    grid.mark(seed);
    let [c0, c1] = seed.corners(grid.w);

    let mut forward = Vec::new();
    let mut corner = c1;
    let mut prev = seed;
    let mut is_loop = false;
    loop {
        match grid.continuation(corner, prev) {
            Some(next) if next == seed => {
                is_loop = true;
                break;
            }
            Some(next) if !grid.visited(next) => {
                grid.mark(next);
                corner = next.other_corner(corner, grid.w);
                forward.push(next);
                prev = next;
            }
            _ => break,
        }
    }

    if is_loop {
        let mut edges = vec![seed];
        edges.extend(forward);
        return Chain {
            edges,
            start: c0,
            is_loop,
        };
    }

    let mut backward = Vec::new();
    let mut corner_b = c0;
    let mut prev_b = seed;
    loop {
        match grid.continuation(corner_b, prev_b) {
            Some(next) if !grid.visited(next) => {
                grid.mark(next);
                corner_b = next.other_corner(corner_b, grid.w);
                backward.push(next);
                prev_b = next;
            }
            _ => break,
        }
    }

    backward.reverse();
    let mut edges = backward;
    edges.push(seed);
    edges.extend(forward);
    Chain {
        edges,
        start: corner_b,
        is_loop: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn land_table(max_id: ProvinceId) -> TerrainTable {
        let mut classes = vec![TerrainClass::Water];
        classes.extend(std::iter::repeat_n(TerrainClass::Land, max_id as usize));
        TerrainTable::new(classes)
    }

    /// Four 2x2 province quadrants on a 4x4 map:
    /// ```text
    /// 1 1 2 2
    /// 1 1 2 2
    /// 3 3 4 4
    /// 3 3 4 4
    /// ```
    fn quadrant_raster() -> ProvinceIdRaster {
        ProvinceIdRaster::from_ids(
            vec![1, 1, 2, 2, 1, 1, 2, 2, 3, 3, 4, 4, 3, 3, 4, 4],
            4,
            4,
        )
    }

    fn segment_edges(seg: &BorderSegment) -> u32 {
        seg.count - 1
    }

    fn run_of(geometry: &BorderGeometry, seg: &BorderSegment) -> u32 {
        geometry.vertices()[seg.start_index as usize].border_id
    }

    /// Vertices of one run, in emission order.
    fn run_vertices<'a>(geometry: &'a BorderGeometry, run: u32) -> Vec<&'a BorderVertex> {
        geometry
            .vertices()
            .iter()
            .filter(|v| v.border_id == run)
            .collect()
    }

    #[test]
    fn test_quadrants_two_internal_runs_and_wrap_seam() {
        let raster = quadrant_raster();
        let geometry = BorderGeometry::extract(&raster, &land_table(4));

        // Vertical internal seam, horizontal seam, and the wrap seam.
        assert_eq!(geometry.run_count(), 3);
        assert_eq!(geometry.segments().len(), 6);
        assert_eq!(geometry.vertices().len(), 18);

        // The wrap-seam run is the one whose vertices all sit on x = 0.
        let wrap_runs: Vec<u32> = (0..geometry.run_count())
            .filter(|&run| run_vertices(&geometry, run).iter().all(|v| v.position[0] == 0.0))
            .collect();
        assert_eq!(wrap_runs.len(), 1, "one run along the wrap seam");

        let mut internal_edges = 0;
        let mut internal_runs = std::collections::HashSet::new();
        for seg in geometry.segments() {
            let run = run_of(&geometry, seg);
            if run != wrap_runs[0] {
                internal_runs.insert(run);
                internal_edges += segment_edges(seg);
            }
        }
        assert_eq!(internal_runs.len(), 2, "one run per internal seam");
        assert_eq!(internal_edges, 8, "4 pixel-edges per internal seam");
    }

    #[test]
    fn test_quadrants_runs_pass_through_cross_junction() {
        let raster = quadrant_raster();
        let geometry = BorderGeometry::extract(&raster, &land_table(4));

        // The internal seams cross at (0.5, 0.5). Each of the two runs
        // passes straight through, contributing two duplicated vertices.
        let at_junction = geometry
            .vertices()
            .iter()
            .filter(|v| v.position == [0.5, 0.5])
            .count();
        assert_eq!(at_junction, 4);

        // The vertical internal seam is a single run with two province
        // pairs: {1,2} above the junction, {3,4} below.
        let vertical_run = (0..geometry.run_count())
            .find(|&run| run_vertices(&geometry, run).iter().all(|v| v.position[0] == 0.5))
            .expect("vertical seam run");
        let vertical: Vec<_> = geometry
            .segments()
            .iter()
            .filter(|&s| run_of(&geometry, s) == vertical_run)
            .collect();
        assert_eq!(vertical.len(), 2);
        assert_eq!(vertical[0].provinces, [1, 2]);
        assert_eq!(vertical[1].provinces, [3, 4]);
    }

    #[test]
    fn test_quadrants_horizontal_seam_closes_over_wrap() {
        let raster = quadrant_raster();
        let geometry = BorderGeometry::extract(&raster, &land_table(4));

        // The horizontal seam circles the cylinder: its run's first and last
        // vertices coincide.
        let horizontal: Vec<_> = geometry
            .segments()
            .iter()
            .filter(|s| s.provinces == [1, 3] || s.provinces == [2, 4])
            .collect();
        assert_eq!(horizontal.len(), 2);
        let run = run_of(&geometry, horizontal[0]);
        assert_eq!(run, run_of(&geometry, horizontal[1]));

        let verts = run_vertices(&geometry, run);
        assert_eq!(verts.first().map(|v| v.position), verts.last().map(|v| v.position));
    }

    #[test]
    fn test_normals_unit_and_perpendicular() {
        let rasters = [
            quadrant_raster(),
            // Single-pixel island, turns at every corner
            ProvinceIdRaster::from_ids(vec![1, 1, 1, 1, 1, 2, 1, 1, 1, 1, 1, 1], 4, 3),
        ];
        for raster in rasters {
            let geometry = BorderGeometry::extract(&raster, &land_table(4));
            assert!(!geometry.vertices().is_empty());
            for v in geometry.vertices() {
                let n = DVec2::new(f64::from(v.normal[0]), f64::from(v.normal[1]));
                let t = DVec2::new(f64::from(v.tangent[0]), f64::from(v.tangent[1]));
                assert!((n.length() - 1.0).abs() < 1e-5, "normal not unit: {n:?}");
                assert!((t.length() - 1.0).abs() < 1e-5, "tangent not unit: {t:?}");
                assert!(n.dot(t).abs() < 1e-5, "normal not perpendicular: {n:?} {t:?}");
            }
        }
    }

    #[test]
    fn test_island_is_one_closed_loop() {
        let raster = ProvinceIdRaster::from_ids(vec![1, 1, 1, 1, 1, 2, 1, 1, 1, 1, 1, 1], 4, 3);
        let geometry = BorderGeometry::extract(&raster, &land_table(2));

        assert_eq!(geometry.run_count(), 1);
        assert_eq!(geometry.segments().len(), 1);
        let seg = geometry.segments()[0];
        assert_eq!(seg.provinces, [1, 2]);
        assert_eq!(seg.count, 5, "4 edges plus the closing vertex");
        let verts = geometry.vertices();
        assert_eq!(verts.first().map(|v| v.position), verts.last().map(|v| v.position));

        // Normals point away from province 1, i.e. into the island pixel.
        let island_center = DVec2::new(1.5 / 4.0, 1.5 / 3.0);
        for v in verts {
            let p = DVec2::new(f64::from(v.position[0]), f64::from(v.position[1]));
            let n = DVec2::new(f64::from(v.normal[0]), f64::from(v.normal[1]));
            assert!(
                n.dot(island_center - p) > 0.0,
                "normal {n:?} at {p:?} should face the island"
            );
        }
    }

    #[test]
    fn test_t_junction_terminates_runs() {
        // Row of 1s over 2|3|1; three borders meet at one T corner.
        let raster = ProvinceIdRaster::from_ids(vec![1, 1, 1, 2, 3, 1], 3, 2);
        let geometry = BorderGeometry::extract(&raster, &land_table(3));

        assert_eq!(geometry.run_count(), 3);
        let junction = [1.0 / 3.0, 0.5];
        let endpoints_at_junction = geometry
            .vertices()
            .iter()
            .filter(|v| {
                (v.position[0] - junction[0]).abs() < 1e-6
                    && (v.position[1] - junction[1]).abs() < 1e-6
            })
            .count();
        assert_eq!(endpoints_at_junction, 3, "each run ends at the T corner");
    }

    #[test]
    fn test_segments_in_bounds_and_disjoint() {
        let raster = quadrant_raster();
        let geometry = BorderGeometry::extract(&raster, &land_table(4));

        let mut covered = vec![false; geometry.vertices().len()];
        for seg in geometry.segments() {
            let start = seg.start_index as usize;
            let end = start + seg.count as usize;
            assert!(end <= geometry.vertices().len());
            for slot in &mut covered[start..end] {
                assert!(!*slot, "segment ranges overlap");
                *slot = true;
            }
        }
        assert!(covered.iter().all(|c| *c), "every vertex belongs to a segment");
    }

    #[test]
    fn test_border_kinds_from_terrain() {
        let raster = quadrant_raster();
        let classes = TerrainTable::new(vec![
            TerrainClass::Water,      // sentinel
            TerrainClass::Land,       // 1
            TerrainClass::Water,      // 2
            TerrainClass::Impassable, // 3
            TerrainClass::Land,       // 4
        ]);
        let geometry = BorderGeometry::extract(&raster, &classes);

        for seg in geometry.segments() {
            let expected = match seg.provinces {
                [1, 2] => BorderKind::Coastal,
                [1, 3] | [3, 4] => BorderKind::Impassable,
                [2, 4] => BorderKind::Coastal,
                other => panic!("unexpected pair {other:?}"),
            };
            assert_eq!(seg.kind, expected, "pair {:?}", seg.provinces);
        }
    }

    #[test]
    fn test_retag_rewrites_kinds_only() {
        let raster = quadrant_raster();
        let mut geometry = BorderGeometry::extract(&raster, &land_table(4));
        assert!(geometry.segments().iter().all(|s| s.kind == BorderKind::Land));

        let before = geometry.vertex_bytes().to_vec();
        let segments_before: Vec<_> = geometry
            .segments()
            .iter()
            .map(|s| (s.start_index, s.count, s.provinces))
            .collect();

        // Province 2 flooded; its borders become coastal.
        geometry.retag(&TerrainTable::new(vec![
            TerrainClass::Water,
            TerrainClass::Land,
            TerrainClass::Water,
            TerrainClass::Land,
            TerrainClass::Land,
        ]));

        assert_eq!(geometry.vertex_bytes(), &before[..], "vertices must not move");
        let segments_after: Vec<_> = geometry
            .segments()
            .iter()
            .map(|s| (s.start_index, s.count, s.provinces))
            .collect();
        assert_eq!(segments_before, segments_after);
        for seg in geometry.segments() {
            let expected = if seg.provinces.contains(&2) {
                BorderKind::Coastal
            } else {
                BorderKind::Land
            };
            assert_eq!(seg.kind, expected);
        }
    }

    #[test]
    fn test_uniform_raster_has_no_borders() {
        let raster = ProvinceIdRaster::from_ids(vec![1; 16], 4, 4);
        let geometry = BorderGeometry::extract(&raster, &land_table(1));
        assert_eq!(geometry.run_count(), 0);
        assert!(geometry.vertices().is_empty());
        assert!(geometry.segments().is_empty());
    }

    #[test]
    fn test_vertex_size_matches_layout() {
        assert_eq!(std::mem::size_of::<BorderVertex>(), BorderVertex::SIZE);
    }

    #[test]
    fn test_kind_classification() {
        use TerrainClass::*;
        assert_eq!(BorderKind::between(Land, Land), BorderKind::Land);
        assert_eq!(BorderKind::between(Land, Water), BorderKind::Coastal);
        assert_eq!(BorderKind::between(Water, Water), BorderKind::Water);
        assert_eq!(BorderKind::between(Impassable, Water), BorderKind::Impassable);
        assert_eq!(BorderKind::between(Land, Impassable), BorderKind::Impassable);
    }
}
