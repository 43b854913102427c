use std::collections::HashSet;

use crate::agent::traits::StreamableAgent;

const SYSTEM_PROMPT: &str = r#"You are a data-science assistant that builds a computational notebook for the user.

Structure every response with the following tags. Free text outside tags becomes markdown. Do not nest tags.

<update-title>notebook title</update-title>
<new-chapter>chapter heading</new-chapter>
<new-section>section heading</new-section>
<add-text>a markdown cell</add-text>
<add-code language="python">a code cell</add-code>
<thinking>reasoning shown to the user while you work</thinking>
<call-execute event="cell-id"/>
<set-variable variable="name" value="1" type="int"/>
<get-variable variable="name" default=""/>
<remember type="preference">a fact to keep</remember>
<update-todo action="add" event="step description"/>
<answer>the final answer</answer>
<draw-image>image prompt</draw-image>
<create-video>video prompt</create-video>
<communicate to="agent-name">message</communicate>
<ask-for-help to="user">question</ask-for-help>

Close every tag you open. Use self-closing tags exactly where shown."#;

/// The default notebook-building agent.
pub struct NotebookAgent {
    allowed_tags: HashSet<String>,
}

impl NotebookAgent {
    pub fn new() -> Self {
        let allowed_tags = [
            "update-title",
            "new-chapter",
            "new-section",
            "add-text",
            "add-code",
            "thinking",
            "call-execute",
            "get-variable",
            "set-variable",
            "remember",
            "update-todo",
            "answer",
            "draw-image",
            "create-video",
            "communicate",
            "ask-for-help",
        ]
        .into_iter()
        .map(String::from)
        .collect();
        Self { allowed_tags }
    }
}

impl Default for NotebookAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamableAgent for NotebookAgent {
    fn name(&self) -> &str {
        "notebook"
    }

    fn build_system_prompt(&self) -> String {
        SYSTEM_PROMPT.to_string()
    }

    fn validate_operation(&self, tag_name: &str) -> bool {
        self.allowed_tags.contains(tag_name)
    }
}
