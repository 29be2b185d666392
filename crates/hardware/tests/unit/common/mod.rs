//! Tests for the common building blocks.
