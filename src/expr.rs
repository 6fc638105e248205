use std::fmt;

/// Folded triangle wave over one channel.
pub fn tri(c: f32) -> f32 {
    1.0 - 2.0 * c.abs()
}

/// Smooth bump/falloff curve over one channel. The denominator is at least 1,
/// so the result is finite for every finite input.
pub fn gravity(c: f32) -> f32 {
    1.0 - 2.0 / (1.0 + c * c).powi(8)
}

/// A node in the expression tree. Children are owned boxes, so every
/// constructed value satisfies its kind's arity by shape alone.
///
/// Kind-specific parameters (the constant triple, sine phase/frequency) are
/// sampled once at construction and never change between evaluations.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    XCoordinate,
    YCoordinate,
    RandomConstant([f32; 3]),
    Product(Box<Expr>, Box<Expr>),
    Average(Box<Expr>, Box<Expr>),
    WeightedAverage {
        a: Box<Expr>,
        b: Box<Expr>,
        weight: Box<Expr>,
    },
    Sine {
        child: Box<Expr>,
        phase: f32,
        frequency: f32,
    },
    Triangle(Box<Expr>),
    Gravity(Box<Expr>),
}

impl Expr {
    /// Evaluate the tree at one coordinate pair, producing a channel triple
    /// nominally in [-1, 1]. Read-only; safe to call once per pixel.
    pub fn eval(&self, x: f32, y: f32) -> [f32; 3] {
        match self {
            Expr::XCoordinate => [x, x, x],
            Expr::YCoordinate => [y, y, y],
            Expr::RandomConstant(rgb) => *rgb,
            Expr::Product(a, b) => {
                let ra = a.eval(x, y);
                let rb = b.eval(x, y);
                [ra[0] * rb[0], ra[1] * rb[1], ra[2] * rb[2]]
            }
            Expr::Average(a, b) => {
                let ra = a.eval(x, y);
                let rb = b.eval(x, y);
                [
                    (ra[0] + rb[0]) / 2.0,
                    (ra[1] + rb[1]) / 2.0,
                    (ra[2] + rb[2]) / 2.0,
                ]
            }
            Expr::WeightedAverage { a, b, weight } => {
                let ra = a.eval(x, y);
                let rb = b.eval(x, y);
                // One scalar weight for all three channels, taken from the
                // weight child's first channel remapped from [-1, 1] to [0, 1].
                let w = (weight.eval(x, y)[0] + 1.0) / 2.0;
                [
                    w * ra[0] + (1.0 - w) * rb[0],
                    w * ra[1] + (1.0 - w) * rb[1],
                    w * ra[2] + (1.0 - w) * rb[2],
                ]
            }
            Expr::Sine {
                child,
                phase,
                frequency,
            } => {
                let r = child.eval(x, y);
                [
                    (r[0] * frequency + phase).sin(),
                    (r[1] * frequency + phase).sin(),
                    (r[2] * frequency + phase).sin(),
                ]
            }
            Expr::Triangle(child) => {
                let r = child.eval(x, y);
                [tri(r[0]), tri(r[1]), tri(r[2])]
            }
            Expr::Gravity(child) => {
                let r = child.eval(x, y);
                [gravity(r[0]), gravity(r[1]), gravity(r[2])]
            }
        }
    }
}

/// Renders the node kind and, recursively, its children, e.g.
/// `Product(XCoordinate(), Sine(YCoordinate()))`. Printed on generation so a
/// pleasing image can be traced back to its tree.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::XCoordinate => write!(f, "XCoordinate()"),
            Expr::YCoordinate => write!(f, "YCoordinate()"),
            Expr::RandomConstant(_) => write!(f, "RandomConstant()"),
            Expr::Product(a, b) => write!(f, "Product({}, {})", a, b),
            Expr::Average(a, b) => write!(f, "Average({}, {})", a, b),
            Expr::WeightedAverage { a, b, weight } => {
                write!(f, "WeightedAverage({}, {}, {})", a, b, weight)
            }
            Expr::Sine { child, .. } => write!(f, "Sine({})", child),
            Expr::Triangle(child) => write!(f, "Triangle({})", child),
            Expr::Gravity(child) => write!(f, "Gravity({})", child),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_terminals_echo_their_axis() {
        for &(x, y) in &[(0.0f32, 0.0f32), (-1.0, 0.5), (0.25, -0.75), (123.0, -9.5)] {
            assert_eq!(Expr::XCoordinate.eval(x, y), [x, x, x]);
            assert_eq!(Expr::YCoordinate.eval(x, y), [y, y, y]);
        }
    }

    #[test]
    fn random_constant_is_stable_across_coordinates() {
        let node = Expr::RandomConstant([0.1, 0.4, 0.9]);
        let first = node.eval(-1.0, -1.0);
        let second = node.eval(0.7, 0.3);
        assert_eq!(first, second);
        assert_eq!(first, [0.1, 0.4, 0.9]);
    }

    #[test]
    fn product_multiplies_per_channel() {
        let node = Expr::Product(
            Box::new(Expr::RandomConstant([0.5, -1.0, 2.0])),
            Box::new(Expr::RandomConstant([0.5, 0.25, -3.0])),
        );
        assert_eq!(node.eval(0.0, 0.0), [0.25, -0.25, -6.0]);
    }

    #[test]
    fn average_is_per_channel_mean() {
        let node = Expr::Average(
            Box::new(Expr::RandomConstant([1.0, 0.0, -1.0])),
            Box::new(Expr::RandomConstant([0.0, 1.0, -1.0])),
        );
        assert_eq!(node.eval(0.0, 0.0), [0.5, 0.5, -1.0]);
    }

    #[test]
    fn weighted_average_boundaries_select_one_child() {
        let a = [0.9, -0.2, 0.3];
        let b = [-0.4, 0.8, -0.6];
        let node = Expr::WeightedAverage {
            a: Box::new(Expr::RandomConstant(a)),
            b: Box::new(Expr::RandomConstant(b)),
            weight: Box::new(Expr::XCoordinate),
        };
        // Weight channel 0 at -1 gives w = 0, selecting b exactly.
        assert_eq!(node.eval(-1.0, 0.0), b);
        // At +1, w = 1, selecting a exactly.
        assert_eq!(node.eval(1.0, 0.0), a);
    }

    #[test]
    fn weighted_average_uses_only_channel_zero_of_weight() {
        let node = Expr::WeightedAverage {
            a: Box::new(Expr::RandomConstant([1.0, 1.0, 1.0])),
            b: Box::new(Expr::RandomConstant([-1.0, -1.0, -1.0])),
            weight: Box::new(Expr::RandomConstant([1.0, -1.0, 0.0])),
        };
        // w derives from channel 0 alone, so every channel picks a.
        assert_eq!(node.eval(0.0, 0.0), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn sine_applies_phase_and_frequency_per_channel() {
        let node = Expr::Sine {
            child: Box::new(Expr::RandomConstant([0.5, -0.25, 0.0])),
            phase: 0.3,
            frequency: 2.0,
        };
        let out = node.eval(0.0, 0.0);
        assert_eq!(out[0], (0.5f32 * 2.0 + 0.3).sin());
        assert_eq!(out[1], (-0.25f32 * 2.0 + 0.3).sin());
        assert_eq!(out[2], 0.3f32.sin());
    }

    #[test]
    fn triangle_stays_in_range_for_unit_inputs() {
        let mut c = -1.0f32;
        while c <= 1.0 {
            let out = tri(c);
            assert!((-1.0..=1.0).contains(&out), "tri({c}) = {out}");
            c += 1.0 / 64.0;
        }
    }

    #[test]
    fn gravity_is_finite_for_extreme_inputs() {
        for &c in &[0.0f32, 1.0, -1.0, 1e3, -1e3, 1e18, f32::MAX, f32::MIN] {
            assert!(gravity(c).is_finite(), "gravity({c}) not finite");
        }
    }

    #[test]
    fn gravity_has_no_pole_at_zero() {
        assert_eq!(gravity(0.0), -1.0);
    }

    #[test]
    fn display_recurses_into_children() {
        let node = Expr::Product(
            Box::new(Expr::XCoordinate),
            Box::new(Expr::Sine {
                child: Box::new(Expr::YCoordinate),
                phase: 0.0,
                frequency: 1.0,
            }),
        );
        assert_eq!(node.to_string(), "Product(XCoordinate(), Sine(YCoordinate()))");
    }
}
