use async_graphql::{Context, ErrorExtensions, Guard, Result};

use crate::jwt::Claims;

/// Verified bearer claims attached to the GraphQL context on each request.
/// None if no valid token was presented.
pub struct AuthContext(pub Option<Claims>);

/// Guard for the platform surface: a verified token carrying `scope`.
pub struct ScopeGuard {
    scope: &'static str,
}

impl ScopeGuard {
    pub fn new(scope: &'static str) -> Self {
        Self { scope }
    }
}

impl Guard for ScopeGuard {
    async fn check(&self, ctx: &Context<'_>) -> Result<()> {
        let auth = ctx.data_opt::<AuthContext>();
        match auth.and_then(|a| a.0.as_ref()) {
            Some(claims) if claims.has_scope(self.scope) => Ok(()),
            Some(claims) => {
                tracing::warn!(user_id = %claims.sub, scope = self.scope, "Required scope missing");
                Err(async_graphql::Error::new(format!(
                    "insufficient permissions: {} scope required",
                    self.scope
                ))
                .extend_with(|_, e| e.set("code", "FORBIDDEN")))
            }
            None => Err(async_graphql::Error::new(
                "OAuth authentication required for platform endpoints",
            )
            .extend_with(|_, e| e.set("code", "UNAUTHENTICATED"))),
        }
    }
}

/// Claims for the current request, if any.
pub fn claims<'a>(ctx: &'a Context<'_>) -> Option<&'a Claims> {
    ctx.data_opt::<AuthContext>().and_then(|a| a.0.as_ref())
}
