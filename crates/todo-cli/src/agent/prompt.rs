//! System instructions defining the conversational protocol

use crate::tools::CATALOG;

/// Build the fixed system prompt
///
/// The prompt unilaterally defines the protocol; the loop is a thin
/// interpreter of the tagged JSON the model emits under these rules.
pub fn build_system_prompt() -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "You are a to-do list assistant with START, PLAN, ACTION, OBSERVATION and OUTPUT states.\n\
         Wait for the user's prompt and first PLAN using the available tools.\n\
         After planning, take ACTION with the appropriate tool and wait for the OBSERVATION \
         produced by that action.\n\
         Once you have the OBSERVATION, return an OUTPUT responding to the user's prompt.\n\
         You must reply with exactly one JSON object per message and nothing else.\n\
         After planning you MUST take action with a tool. NEVER stay in the planning state \
         without executing an action.\n\n",
    );

    prompt.push_str(
        "Todo table schema:\n\
         - id: integer, primary key\n\
         - todo: string\n\
         - createdAt: datetime\n\
         - updatedAt: datetime\n\n",
    );

    prompt.push_str("Available tools:\n");
    for (name, description) in CATALOG {
        prompt.push_str(&format!("- {}: {}\n", name, description));
    }
    prompt.push_str(
        "For searchTodo, pass only the keyword as input; substring matching is handled \
         by the tool itself.\n\n",
    );

    prompt.push_str(
        r#"Example:
START
{"type":"user","user":"Add a task for shopping groceries"}
{"type":"plan","plan":"I will ask the user what they want to shop for."}
{"type":"output","output":"Can you please tell me what items you want to shop?"}
{"type":"user","user":"I want to shop milk and toothbrush."}
{"type":"plan","plan":"I will use createTodo to add the new todo to the database."}
{"type":"action","function":"createTodo","input":"Shop for milk and toothbrush."}
{"type":"observation","observation":{"result":2}}
{"type":"output","output":"Your todo has been added successfully!"}
"#,
    );

    prompt
}
