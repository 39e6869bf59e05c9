//! Static pools the generator samples from.

pub static WORDS: &[&str] = &[
    "the", "quick", "brown", "fox", "jumps", "over", "lazy", "dog", "apple", "banana", "cherry",
    "delta", "echo", "foxtrot", "golf", "hotel", "india", "juliet", "kilo", "lima", "mike",
    "november", "oscar", "papa", "quebec", "romeo", "sierra", "tango", "uniform", "victor",
    "whiskey", "xray", "yankee", "zulu", "alpha", "bravo", "charlie", "computer", "keyboard",
    "mouse", "screen", "window", "document", "folder", "file", "system", "network", "internet",
    "browser", "search", "engine", "database", "server", "client", "application", "program",
    "software", "hardware", "memory", "processor", "storage", "cloud", "security", "password",
    "username", "login", "logout", "session", "cookie", "cache", "buffer", "queue", "stack",
    "array", "list", "dictionary", "set", "tuple", "string", "integer", "float", "boolean",
    "variable", "function", "method", "class", "object", "instance", "module", "package",
    "library", "framework", "algorithm", "data", "structure", "loop", "condition", "branch",
    "recursion", "iteration", "parameter", "argument", "return", "value", "type", "meeting",
    "project", "deadline", "schedule", "calendar", "appointment", "presentation", "report",
    "analysis", "strategy", "planning", "implementation", "execution", "delivery",
    "stakeholder", "collaboration", "communication", "feedback", "review", "approval", "budget",
    "timeline", "milestone", "objective", "goal", "target", "metric", "performance", "outcome",
    "initiative", "opportunity", "challenge", "solution", "recommendation", "decision",
    "action", "update", "status", "progress", "completion", "achievement", "success",
    "improvement",
];

pub static SENTENCES: &[&str] = &[
    "I hope this message finds you well and that you have had a productive week so far.",
    "Following our recent discussion regarding the quarterly projections, I wanted to share some additional insights.",
    "The team has been working diligently on the strategic initiative we outlined during our planning session.",
    "I am writing to provide an update on the current status of our ongoing projects and key milestones.",
    "Our analysis indicates that implementing these proposed changes could result in improved efficiency.",
    "We have identified several opportunities for optimization that could enhance operational performance.",
    "The preliminary findings from our market research suggest that customer preferences are shifting significantly.",
    "I wanted to reach out to discuss the possibility of scheduling a meeting to review the roadmap.",
    "Based on the feedback we received from various departments, we have refined our approach considerably.",
    "It would be beneficial to collaborate on this initiative as it aligns with our strategic goals.",
    "Please let me know if you have any questions or would like to discuss this proposal further.",
    "I appreciate your continued support and look forward to working together on this project.",
    "The revised timeline accounts for potential challenges and includes contingency plans to mitigate risks.",
    "Our stakeholders have expressed enthusiasm about the direction we are taking with this initiative.",
    "I believe this represents a valuable opportunity to strengthen our competitive position in the market.",
    "Thank you for taking the time to review this information and for your thoughtful consideration.",
    "The data clearly supports the recommendation to proceed with the next phase of implementation.",
    "I am available to answer any questions and can provide additional documentation if needed.",
    "This initiative has the potential to transform how we operate and create lasting benefits.",
    "Your insights and expertise would be invaluable as we navigate this transition successfully.",
];

pub static GREETINGS: &[&str] = &[
    "Dear Team,",
    "Dear Colleagues,",
    "Hello,",
    "Good afternoon,",
    "Dear All,",
];

pub static CLOSINGS: &[&str] = &[
    "Best regards,",
    "Kind regards,",
    "Sincerely,",
    "Thank you,",
    "Warm regards,",
];

pub const SIGNATURE: &str = "[Your Name]";
