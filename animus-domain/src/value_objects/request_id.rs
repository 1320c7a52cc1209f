// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Request identifier value object, propagated through the request context
//! for tracing and idempotency-adjacent logging (not itself an idempotency key).

use crate::define_id;

define_id!(RequestId, "request");
