// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Dataset version identifier value object.
//!
//! Distinct from the version's [`crate::value_objects::Ordinal`]: the id
//! identifies the row, the ordinal carries the dense, per-dataset sequence
//! number used for ordering and gap detection.

use crate::define_id;

define_id!(DatasetVersionId, "dataset_version");
