//! Workspace root package. Hosts workspace-level tooling such as the
//! pre-commit hooks; the library and CLI live under `crates/`.
