//!
//! # Decision tree learning
//! `tablearn-trees` provides pure Rust implementations of binary decision trees.
//!
//! # The big picture
//!
//! Decision trees are a non-parametric supervised learning method. The goal is to create a model
//! that predicts the value of a target variable by learning simple threshold rules inferred from
//! the features. Every inner node compares one feature against a split value, observations with
//! a smaller or equal value go to the left subtree.
//!
//! # Current state
//!
//! `tablearn-trees` provides
//! * a [classification tree](DecisionTree) which chooses splits by the sample-weighted Gini
//!   impurity of the two children
//! * a [regression tree](RegressionTree) which chooses splits by the weighted variance and
//!   predicts the mean target of a leaf
//!

mod decision_trees;

pub use decision_trees::*;
pub use tablearn::error::Result;
