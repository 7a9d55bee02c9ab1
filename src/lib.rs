//! Root package for workspace-level tooling (pre-commit hooks); intentionally empty.
