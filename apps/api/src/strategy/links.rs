//! Pillar–audience links. At most one link exists per (pillar, audience);
//! setting a strength updates it in place, clearing the strength removes it.

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::strategy::{LinkStrength, PillarAudienceLink};
use crate::store::{ContentStore, StrategyStore};

pub const MIN_STRENGTH: i16 = 1;
pub const MAX_STRENGTH: i16 = 10;

#[derive(Debug, Clone, Deserialize)]
pub struct LinkRequest {
    pub user_id: Uuid,
    pub pillar_id: Uuid,
    pub audience_id: Uuid,
    /// `None` removes the link.
    pub strength: Option<i16>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum LinkChange {
    Saved {
        link: PillarAudienceLink,
        level: LinkStrength,
    },
    Removed {
        pillar_id: Uuid,
        audience_id: Uuid,
        existed: bool,
    },
}

pub fn validate_strength(strength: i16) -> Result<(), AppError> {
    if (MIN_STRENGTH..=MAX_STRENGTH).contains(&strength) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Link strength must be between {MIN_STRENGTH} and {MAX_STRENGTH}, got {strength}"
        )))
    }
}

async fn ensure_owned(store: &dyn ContentStore, req: &LinkRequest) -> Result<(), AppError> {
    let pillars = store.list_pillars(req.user_id).await?;
    if !pillars.iter().any(|p| p.id == req.pillar_id) {
        return Err(AppError::not_found("Content pillar", req.pillar_id));
    }
    let audiences = store.list_audiences(req.user_id).await?;
    if !audiences.iter().any(|a| a.id == req.audience_id) {
        return Err(AppError::not_found("Target audience", req.audience_id));
    }
    Ok(())
}

pub async fn set_link(store: &dyn ContentStore, req: LinkRequest) -> Result<LinkChange, AppError> {
    match req.strength {
        Some(strength) => {
            validate_strength(strength)?;
            ensure_owned(store, &req).await?;
            let link = store
                .upsert_link(req.user_id, req.pillar_id, req.audience_id, strength)
                .await?;
            info!(
                pillar_id = %req.pillar_id,
                audience_id = %req.audience_id,
                strength,
                "Saved pillar-audience link"
            );
            Ok(LinkChange::Saved {
                level: link.level(),
                link,
            })
        }
        None => {
            let existed = store.delete_link(req.pillar_id, req.audience_id).await?;
            info!(
                pillar_id = %req.pillar_id,
                audience_id = %req.audience_id,
                existed,
                "Removed pillar-audience link"
            );
            Ok(LinkChange::Removed {
                pillar_id: req.pillar_id,
                audience_id: req.audience_id,
                existed,
            })
        }
    }
}
