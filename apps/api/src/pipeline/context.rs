//! Loads everything a prompt needs for one user in one place.

use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::prompt_builder::{BusinessContext, IdeaBrief, PromptInput};
use crate::models::strategy::{ContentPillar, TargetAudience};
use crate::models::style::WritingStyleProfile;
use crate::models::user::UserProfile;
use crate::models::ContentType;
use crate::store::{ContentStore, ProfileStore, StrategyStore};

/// The author's business identity, strategy and style as read at generation time.
#[derive(Debug, Clone, Default)]
pub struct GenerationContext {
    pub user: Option<UserProfile>,
    pub pillars: Vec<ContentPillar>,
    pub audiences: Vec<TargetAudience>,
    pub style: Option<WritingStyleProfile>,
}

impl GenerationContext {
    /// Pillars and audiences are narrowed to the ids an idea references. An idea
    /// that references none gets the user's full strategy.
    pub async fn load(
        store: &dyn ContentStore,
        user_id: Uuid,
        pillar_ids: &[Uuid],
        audience_ids: &[Uuid],
    ) -> Result<Self, AppError> {
        let user = store.get_user(user_id).await?;
        let pillars = narrow(store.list_pillars(user_id).await?, pillar_ids, |p| p.id);
        let audiences = narrow(store.list_audiences(user_id).await?, audience_ids, |a| a.id);
        let style = store.get_style_profile(user_id).await?;

        Ok(Self {
            user,
            pillars,
            audiences,
            style,
        })
    }

    pub fn tenant_id(&self) -> Option<Uuid> {
        self.user.as_ref().and_then(|u| u.tenant_id)
    }

    pub fn business(&self) -> BusinessContext<'_> {
        match &self.user {
            Some(user) => BusinessContext {
                author_name: user.full_name.as_deref(),
                business_name: user.business_name.as_deref(),
                business_description: user.business_description.as_deref(),
            },
            None => BusinessContext::default(),
        }
    }

    /// LinkedIn prompts always carry an examples block (possibly the
    /// placeholder); other content types carry none.
    pub fn prompt_input<'a>(
        &'a self,
        idea: IdeaBrief<'a>,
        content_type: ContentType,
    ) -> PromptInput<'a> {
        let examples = match content_type {
            ContentType::Linkedin => Some(
                self.style
                    .as_ref()
                    .map(|s| s.linkedin_examples.as_slice())
                    .unwrap_or(&[]),
            ),
            _ => None,
        };

        PromptInput {
            business: self.business(),
            pillars: &self.pillars,
            audiences: &self.audiences,
            style: self.style.as_ref(),
            content_type,
            examples,
            idea,
            custom_instructions: self
                .style
                .as_ref()
                .and_then(|s| s.custom_prompt_instructions.as_deref()),
        }
    }
}

fn narrow<T>(items: Vec<T>, wanted: &[Uuid], id: impl Fn(&T) -> Uuid) -> Vec<T> {
    if wanted.is_empty() {
        return items;
    }
    items.into_iter().filter(|item| wanted.contains(&id(item))).collect()
}
