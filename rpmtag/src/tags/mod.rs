// This file is part of the product rpmtag.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

pub mod backup;
pub mod diff;
pub mod error;
pub mod kind;
pub mod metadata;
pub mod workflow;

pub use diff::{DIFF_FILE_NAME, DiffRecord, PackageDelta};
pub use error::{TagError, TagWarning};
pub use kind::TagKind;
pub use metadata::{CommandGenerator, MetadataError, MetadataGenerator};
pub use workflow::{TagOutcome, TagWorkflow};
