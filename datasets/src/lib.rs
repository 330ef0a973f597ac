//! `tablearn-datasets` provides synthetic datasets ready to be used in tests, benchmarks and
//! examples.
//!
//! Every generator takes a random number generator, so seeding it makes the generated data
//! reproducible:
//! ```
//! use rand::{rngs::SmallRng, SeedableRng};
//! use tablearn_datasets::generate;
//!
//! let mut rng = SmallRng::seed_from_u64(42);
//! let table = generate::customers(100, &mut rng);
//! assert_eq!(table.nrows(), 100);
//! ```

pub mod generate;
