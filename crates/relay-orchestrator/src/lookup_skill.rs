use async_trait::async_trait;
use relay_artifacts::ArtifactStore;
use relay_core::{RelayResult, Skill, SkillDescriptor, ToolCall, ToolResult};
use std::sync::Arc;

/// Read-only skill that lets an agent fetch artifact content by id.
pub struct ArtifactLookupSkill {
    descriptor: SkillDescriptor,
    store: Arc<ArtifactStore>,
}

impl ArtifactLookupSkill {
    pub fn new(store: Arc<ArtifactStore>) -> Self {
        Self {
            descriptor: SkillDescriptor {
                name: "artifact_lookup".to_string(),
                description: "Look up artifacts referenced in the conversation. \
                    Use action 'retrieve' with the id from an <artifact id=\"...\" /> tag \
                    to read its full content, or 'list' to see all artifacts."
                    .to_string(),
                parameters_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "action": {
                            "type": "string",
                            "enum": ["retrieve", "list"],
                            "description": "The operation to perform"
                        },
                        "id": {
                            "type": "string",
                            "description": "Artifact id (required for retrieve)"
                        }
                    },
                    "required": ["action"]
                }),
            },
            store,
        }
    }
}

#[async_trait]
impl Skill for ArtifactLookupSkill {
    fn descriptor(&self) -> &SkillDescriptor {
        &self.descriptor
    }

    async fn execute(&self, call: ToolCall) -> RelayResult<ToolResult> {
        let action = call.arguments["action"].as_str().unwrap_or("");

        match action {
            "retrieve" => {
                let id = call.arguments["id"].as_str().unwrap_or("");
                if id.is_empty() {
                    return Ok(ToolResult::error(&call.id, "Id is required for retrieve"));
                }

                let body = match self.store.get(id) {
                    Some(artifact) => serde_json::json!({
                        "found": true,
                        "id": artifact.id(),
                        "summary": artifact.summary(),
                        "content": artifact.content(),
                    }),
                    None => serde_json::json!({
                        "found": false,
                        "id": id,
                    }),
                };
                Ok(ToolResult::success(&call.id, body.to_string()))
            }
            "list" => {
                let items: Vec<serde_json::Value> = self
                    .store
                    .list()
                    .into_iter()
                    .map(|entry| {
                        serde_json::json!({
                            "id": entry.id,
                            "summary": entry.summary,
                            "created_by": entry.created_by,
                            "size": entry.size,
                        })
                    })
                    .collect();
                Ok(ToolResult::success(
                    &call.id,
                    serde_json::json!({
                        "count": items.len(),
                        "artifacts": items,
                    })
                    .to_string(),
                ))
            }
            _ => Ok(ToolResult::error(
                &call.id,
                "Invalid action. Use 'retrieve' or 'list'",
            )),
        }
    }
}
