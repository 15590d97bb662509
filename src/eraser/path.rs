use egui::Pos2;

/// One drawing command of a captured freehand stroke
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Pos2),
    LineTo(Pos2),
    QuadTo { ctrl: Pos2, to: Pos2 },
}

impl PathCommand {
    pub fn map(self, f: impl Fn(Pos2) -> Pos2) -> Self {
        match self {
            PathCommand::MoveTo(p) => PathCommand::MoveTo(f(p)),
            PathCommand::LineTo(p) => PathCommand::LineTo(f(p)),
            PathCommand::QuadTo { ctrl, to } => PathCommand::QuadTo {
                ctrl: f(ctrl),
                to: f(to),
            },
        }
    }
}

/// A completed freehand stroke in scene space
#[derive(Debug, Clone, PartialEq)]
pub struct StrokePath {
    commands: Vec<PathCommand>,
    width: f32,
}

impl StrokePath {
    /// Smooth raw pointer samples into a path.
    ///
    /// Consecutive samples become quadratic segments whose end points are the
    /// midpoints between samples, with the sample itself as control point.
    /// Returns `None` for an empty sample list.
    pub fn from_points(points: &[Pos2], width: f32) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut commands = Vec::with_capacity(points.len() + 1);
        commands.push(PathCommand::MoveTo(*first));

        match rest {
            [] => {}
            [only] => commands.push(PathCommand::LineTo(*only)),
            _ => {
                for pair in points[1..].windows(2) {
                    commands.push(PathCommand::QuadTo {
                        ctrl: pair[0],
                        to: pair[0].lerp(pair[1], 0.5),
                    });
                }
                if let Some(last) = points.last() {
                    commands.push(PathCommand::LineTo(*last));
                }
            }
        }

        Some(Self { commands, width })
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    /// Every point the path passes through or bends towards
    pub fn points(&self) -> impl Iterator<Item = Pos2> + '_ {
        self.commands.iter().flat_map(|c| match *c {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => [Some(p), None],
            PathCommand::QuadTo { ctrl, to } => [Some(ctrl), Some(to)],
        })
        .flatten()
    }

    /// Whether the stroke covers no distance, i.e. a single dab of the brush
    pub fn is_dot(&self) -> bool {
        let mut points = self.points();
        let Some(first) = points.next() else {
            return true;
        };
        points.all(|p| (p - first).length() < 1e-3)
    }

    /// The same stroke with every point mapped through `f` and a new width
    pub fn map(&self, f: impl Fn(Pos2) -> Pos2, width: f32) -> Self {
        Self {
            commands: self.commands.iter().map(|c| c.map(&f)).collect(),
            width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_points_give_no_path() {
        assert!(StrokePath::from_points(&[], 20.0).is_none());
    }

    #[test]
    fn test_single_point_is_a_dot() {
        let path = StrokePath::from_points(&[Pos2::new(5.0, 5.0)], 20.0).unwrap();
        assert!(path.is_dot());
        assert_eq!(path.commands().len(), 1);
    }

    #[test]
    fn test_smoothing_uses_midpoints() {
        let points = [
            Pos2::new(0.0, 0.0),
            Pos2::new(10.0, 0.0),
            Pos2::new(20.0, 10.0),
        ];
        let path = StrokePath::from_points(&points, 4.0).unwrap();
        assert_eq!(
            path.commands(),
            &[
                PathCommand::MoveTo(Pos2::new(0.0, 0.0)),
                PathCommand::QuadTo {
                    ctrl: Pos2::new(10.0, 0.0),
                    to: Pos2::new(15.0, 5.0),
                },
                PathCommand::LineTo(Pos2::new(20.0, 10.0)),
            ]
        );
        assert!(!path.is_dot());
    }
}
