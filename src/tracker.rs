use tracing::{debug, trace};

use crate::errors::{BuildError, ExcavateError};
use crate::terrain::{ArenaTerrain, Terrain};

/// Running `(sum, count)` of elevations from the head of the landscape
/// through one landform, inclusive. `count` doubles as the landform's
/// 1-based position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Prefix {
    sum: i64,
    count: usize,
}

impl Prefix {
    const EMPTY: Prefix = Prefix { sum: 0, count: 0 };

    fn extend(self, height: i64) -> Prefix {
        Prefix {
            sum: self.sum + height,
            count: self.count + 1,
        }
    }

    fn treasure(self) -> f64 {
        self.sum as f64 / self.count as f64
    }
}

/// The leftmost valley together with the prefix aggregate that makes its
/// treasure an O(1) read. Kept as one unit so the aggregate cannot outlive
/// the handle it describes.
#[derive(Debug, Clone, Copy)]
struct Valley<H> {
    at: H,
    prefix: Prefix,
}

/// Tracks the leftmost valley of a landscape of distinct elevations and the
/// treasure buried under it, without rescanning the whole landscape on every
/// query.
///
/// Elevations must stay pairwise distinct. Raising a landform whose height
/// duplicates an existing elevation violates that precondition and leaves
/// valley selection unspecified.
pub struct ValleyTracker<T: Terrain = ArenaTerrain> {
    terrain: T,
    valley: Option<Valley<T::Handle>>,
    total_treasure: f64,
}

impl ValleyTracker<ArenaTerrain> {
    /// Charts a landscape from elevations in travel order. The elevations
    /// must be pairwise distinct.
    pub fn new(landscape: &[i64]) -> Result<Self, BuildError> {
        if landscape.is_empty() {
            return Err(BuildError::EmptyLandscape);
        }
        let mut terrain = ArenaTerrain::with_capacity(landscape.len());
        for &height in landscape {
            terrain.push_back(height);
        }
        Ok(Self::from_terrain(terrain))
    }
}

impl<T: Terrain> ValleyTracker<T> {
    fn from_terrain(terrain: T) -> Self {
        let mut tracker = Self {
            terrain,
            valley: None,
            total_treasure: 0.0,
        };
        tracker.valley = tracker.scan(tracker.terrain.head(), Prefix::EMPTY);
        tracker
    }

    /// True when the landscape has been fully excavated.
    pub fn is_empty(&self) -> bool {
        self.terrain.is_empty()
    }

    /// Number of landforms still standing.
    pub fn len(&self) -> usize {
        self.terrain.len()
    }

    /// Current elevations in travel order.
    pub fn heights(&self) -> impl Iterator<Item = i64> + '_ {
        std::iter::successors(self.terrain.head(), |&at| self.terrain.next(at))
            .map(|at| self.terrain.height(at))
    }

    /// Treasure waiting at the leftmost valley: the mean of every elevation
    /// from the start of the landscape through the valley itself.
    pub fn first_treasure(&self) -> Result<f64, ExcavateError> {
        self.valley
            .map(|valley| valley.prefix.treasure())
            .ok_or(ExcavateError::NothingLeft)
    }

    /// Collects the treasure at the leftmost valley and removes that
    /// landform from the landscape. Returns the collected treasure.
    pub fn excavate(&mut self) -> Result<f64, ExcavateError> {
        let Valley { at, prefix } = self.valley.take().ok_or(ExcavateError::NothingLeft)?;
        let treasure = prefix.treasure();
        self.total_treasure += treasure;

        let removed = self.terrain.remove(at);
        // Landforms left of the former predecessor kept both their
        // neighbors, and none of them was a valley before, so the new
        // leftmost valley is either that predecessor or at/after the former
        // successor.
        let through_prev = Prefix {
            sum: prefix.sum - removed.height,
            count: prefix.count - 1,
        };
        self.valley = match removed.prev {
            Some(prev) if self.terrain.is_valley(prev) => Some(Valley {
                at: prev,
                prefix: through_prev,
            }),
            _ => self.scan(removed.next, through_prev),
        };

        debug!(treasure, remaining = self.terrain.len(), "excavated first valley");
        Ok(treasure)
    }

    /// Raises a new landform with the given height directly before the
    /// current leftmost valley, or as the sole landform when the landscape
    /// is empty. `height` must not duplicate an existing elevation.
    pub fn insert(&mut self, height: i64) {
        self.valley = match self.valley.take() {
            None => {
                let at = self.terrain.push_back(height);
                Some(Valley {
                    at,
                    prefix: Prefix::EMPTY.extend(height),
                })
            }
            Some(Valley { at: old, prefix }) => {
                let raised = self.terrain.insert_before(old, height);
                // Only the new landform and its two neighbors changed
                // shape; everything further left stays a non-valley, so the
                // candidates are the new landform, its predecessor, and
                // then whatever a walk from the pushed-aside old valley
                // finds.
                let before_new = Prefix {
                    sum: prefix.sum - self.terrain.height(old),
                    count: prefix.count - 1,
                };
                if self.terrain.is_valley(raised) {
                    Some(Valley {
                        at: raised,
                        prefix: before_new.extend(height),
                    })
                } else {
                    match self.terrain.prev(raised) {
                        Some(prev) if self.terrain.is_valley(prev) => Some(Valley {
                            at: prev,
                            prefix: before_new,
                        }),
                        _ => self.scan(Some(old), before_new.extend(height)),
                    }
                }
            }
        };
        debug!(height, len = self.terrain.len(), "raised landform at valley");
    }

    /// Treasure collected by every excavation so far. Never resets.
    pub fn total_treasure(&self) -> f64 {
        self.total_treasure
    }

    /// Walks right from `start` until a valley shows up, extending `prefix`
    /// (the aggregate of everything strictly left of `start`) along the way.
    /// The first step is the cheap neighbor check; anything past it is the
    /// linear fallback, which a long monotonic run can stretch to O(n).
    fn scan(&self, start: Option<T::Handle>, mut prefix: Prefix) -> Option<Valley<T::Handle>> {
        let mut steps = 0usize;
        let mut cursor = start;
        while let Some(at) = cursor {
            steps += 1;
            prefix = prefix.extend(self.terrain.height(at));
            if self.terrain.is_valley(at) {
                if steps > 1 {
                    trace!(steps, "valley scan fell back to a linear walk");
                }
                return Some(Valley { at, prefix });
            }
            cursor = self.terrain.next(at);
        }
        None
    }
}
