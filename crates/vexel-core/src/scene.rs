// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Minimal scene-tree stand-ins exchanged with vector-capable loaders.
//!
//! The renderer owns the real paint tree; loaders only need to emit path
//! geometry (fonts, vector pictures) and to rescale a picture root.

/// A 2D point in user space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl Point {
    /// Creates a point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A 2D affine transform stored as the top two rows of a 3x3 matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Row 1, column 1 (x scale).
    pub e11: f32,
    /// Row 1, column 2 (x skew).
    pub e12: f32,
    /// Row 1, column 3 (x translation).
    pub e13: f32,
    /// Row 2, column 1 (y skew).
    pub e21: f32,
    /// Row 2, column 2 (y scale).
    pub e22: f32,
    /// Row 2, column 3 (y translation).
    pub e23: f32,
}

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        e11: 1.0,
        e12: 0.0,
        e13: 0.0,
        e21: 0.0,
        e22: 1.0,
        e23: 0.0,
    };

    /// A non-uniform scale about the origin.
    pub fn from_scale(sx: f32, sy: f32) -> Self {
        Self {
            e11: sx,
            e22: sy,
            ..Self::IDENTITY
        }
    }

    /// A translation.
    pub fn from_translation(tx: f32, ty: f32) -> Self {
        Self {
            e13: tx,
            e23: ty,
            ..Self::IDENTITY
        }
    }

    /// Returns `self * rhs`: `rhs` is applied first.
    pub fn then(&self, rhs: &Transform) -> Transform {
        Transform {
            e11: self.e11 * rhs.e11 + self.e12 * rhs.e21,
            e12: self.e11 * rhs.e12 + self.e12 * rhs.e22,
            e13: self.e11 * rhs.e13 + self.e12 * rhs.e23 + self.e13,
            e21: self.e21 * rhs.e11 + self.e22 * rhs.e21,
            e22: self.e21 * rhs.e12 + self.e22 * rhs.e22,
            e23: self.e21 * rhs.e13 + self.e22 * rhs.e23 + self.e23,
        }
    }

    /// Maps a point through the transform.
    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.e11 * p.x + self.e12 * p.y + self.e13,
            self.e21 * p.x + self.e22 * p.y + self.e23,
        )
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A single path verb. Each verb consumes a fixed number of points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathCommand {
    /// Starts a sub-path (1 point).
    MoveTo,
    /// Straight segment (1 point).
    LineTo,
    /// Cubic bezier (3 points).
    CubicTo,
    /// Closes the current sub-path (0 points).
    Close,
}

impl PathCommand {
    /// Number of points this verb consumes.
    pub fn point_count(self) -> usize {
        match self {
            PathCommand::MoveTo | PathCommand::LineTo => 1,
            PathCommand::CubicTo => 3,
            PathCommand::Close => 0,
        }
    }
}

/// Path geometry plus its local transform.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Shape {
    commands: Vec<PathCommand>,
    points: Vec<Point>,
    transform: Transform,
}

impl Shape {
    /// Creates an empty shape.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new sub-path at `p`.
    pub fn move_to(&mut self, p: Point) -> &mut Self {
        self.commands.push(PathCommand::MoveTo);
        self.points.push(p);
        self
    }

    /// Appends a line to `p`.
    pub fn line_to(&mut self, p: Point) -> &mut Self {
        self.commands.push(PathCommand::LineTo);
        self.points.push(p);
        self
    }

    /// Appends a cubic bezier.
    pub fn cubic_to(&mut self, c1: Point, c2: Point, end: Point) -> &mut Self {
        self.commands.push(PathCommand::CubicTo);
        self.points.extend([c1, c2, end]);
        self
    }

    /// Closes the current sub-path.
    pub fn close(&mut self) -> &mut Self {
        self.commands.push(PathCommand::Close);
        self
    }

    /// Moves all geometry of `other` to the end of this shape.
    ///
    /// `other`'s transform is baked into its points first.
    pub fn append(&mut self, other: Shape) {
        let Shape {
            commands,
            points,
            transform,
        } = other;
        self.commands.extend(commands);
        self.points
            .extend(points.into_iter().map(|p| transform.apply(p)));
    }

    /// Runs `build` against an empty staging shape and commits its geometry only
    /// when `build` returns `true`.
    ///
    /// On `false` this shape is left exactly as it was.
    pub fn append_staged<F>(&mut self, build: F) -> bool
    where
        F: FnOnce(&mut Shape) -> bool,
    {
        let mut staging = Shape::new();
        if !build(&mut staging) {
            return false;
        }
        self.append(staging);
        true
    }

    /// The path verbs.
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// The path points, in verb order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Returns `true` if the shape has no geometry.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// The local transform.
    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Replaces the local transform.
    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }
}

/// The payload of a paint node.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintNode {
    /// A single shape.
    Shape(Shape),
    /// A group of child paints.
    Scene(Vec<Paint>),
}

/// A renderable scene-tree node.
#[derive(Debug, Clone, PartialEq)]
pub struct Paint {
    node: PaintNode,
    transform: Transform,
}

impl Paint {
    /// Wraps a shape.
    pub fn shape(shape: Shape) -> Self {
        Self {
            node: PaintNode::Shape(shape),
            transform: Transform::IDENTITY,
        }
    }

    /// Groups child paints.
    pub fn scene(children: Vec<Paint>) -> Self {
        Self {
            node: PaintNode::Scene(children),
            transform: Transform::IDENTITY,
        }
    }

    /// The node payload.
    pub fn node(&self) -> &PaintNode {
        &self.node
    }

    /// The node transform.
    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Replaces the node transform.
    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    /// Scales a `src_w` x `src_h` picture uniformly to fit `w` x `h`, centred.
    ///
    /// Returns `false` and leaves the transform untouched for degenerate sizes.
    pub fn fit_to(&mut self, src_w: f32, src_h: f32, w: f32, h: f32) -> bool {
        if !(src_w > 0.0 && src_h > 0.0 && w > 0.0 && h > 0.0) {
            return false;
        }
        let scale = (w / src_w).min(h / src_h);
        let tx = (w - src_w * scale) * 0.5;
        let ty = (h - src_h * scale) * 0.5;
        self.transform =
            Transform::from_translation(tx, ty).then(&Transform::from_scale(scale, scale));
        true
    }
}
