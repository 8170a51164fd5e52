use courtside_db::table::Social;
use courtside_shared::Metadata;
use serde::Serialize;

use crate::store;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckinCode {
    pub social_id: String,
    pub url: String,
    pub qr_code: String,
}

impl super::Command {
    #[tracing::instrument(skip(self, metadata))]
    pub async fn checkin_qr_code(
        &self,
        social_id: &str,
        metadata: &Metadata,
        now: i64,
    ) -> courtside_shared::Result<CheckinCode> {
        super::parse_id(social_id)?;
        metadata.trigger_by()?;

        let Some(social) = store::social::find(&self.read_db, social_id).await? else {
            courtside_shared::not_found!("social");
        };

        if !Self::is_host_or_admin(&social, metadata) {
            return Err(courtside_shared::Error::NotAuthorized);
        }

        let url = self.policy.checkin_url(social_id);
        let qr_code = self.qr.generate(&url)?;

        if !social.qr_code_generated {
            let mut conn = self.write_db.acquire().await?;
            store::social::claim_flag(&mut conn, social_id, Social::QrCodeGenerated, now).await?;
        }

        Ok(CheckinCode {
            social_id: social.id,
            url,
            qr_code,
        })
    }
}
