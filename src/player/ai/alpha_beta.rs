/// Running `alpha`/`beta` window of an alpha-beta node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub alpha: f64,
    pub beta: f64,
}

impl Bounds {
    pub const FULL: Bounds = Bounds {
        alpha: f64::NEG_INFINITY,
        beta: f64::INFINITY,
    };

    /// Tightens the window with a child's value and reports whether the
    /// remaining siblings can be skipped.
    pub fn update(&mut self, value: f64, maximizing: bool) -> bool {
        if maximizing {
            self.alpha = self.alpha.max(value);
        } else {
            self.beta = self.beta.min(value);
        }
        self.alpha >= self.beta
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Bounds::FULL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_window_never_cuts_on_finite() {
        let mut b = Bounds::FULL;
        assert!(!b.update(10.0, true));
        assert_eq!(b.alpha, 10.0);
        assert!(!b.update(20.0, false));
        assert_eq!(b.beta, 20.0);
    }

    #[test]
    fn test_cutoff() {
        let mut b = Bounds {
            alpha: 5.0,
            beta: 8.0,
        };
        assert!(b.update(8.0, true));

        let mut b = Bounds {
            alpha: 5.0,
            beta: 8.0,
        };
        assert!(!b.update(6.0, false));
        assert!(b.update(4.0, false));
    }

    #[test]
    fn test_win_closes_window() {
        let mut b = Bounds::FULL;
        assert!(b.update(f64::INFINITY, true));
    }
}
