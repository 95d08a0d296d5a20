//! Canned replies and snippets used by the synthesizer.
//!
//! Lookup tables are ordered: the first keyword contained in a request wins.

pub const GREETING_WORDS: &[&str] = &["hello", "hi", "hey", "greetings"];

pub const GREETINGS: &[&str] = &[
    "Hello! How can I help you code today?",
    "Hi there! What can I help you with?",
    "Hey! Ready to write some amazing code?",
];

pub const HELP_MESSAGES: &[&str] = &[
    "Of course! I can explain programming concepts, generate code snippets, and more. Try asking \"what is a promise?\" or \"generate a fetch example\".",
    "I can help with that! Ask me to explain concepts like \"async/await\" or \"arrays\". You can also ask me to generate code.",
];

pub const UNKNOWN_REPLIES: &[&str] = &[
    "I'm not sure how to answer that yet. I'm still under development. Try asking about functions, variables, or loops!",
    "That's a great question! I don't have an answer for it right now, but I'm learning more every day.",
    "I'm sorry, I can't help with that particular query at the moment. Could you try rephrasing it?",
];

pub const GENERATE_FALLBACKS: &[&str] = &[
    "I can't generate that specific code yet, but I'm learning every day! Try asking for a 'hello world function' or a 'person class'.",
    "That's a bit too complex for me right now. How about we start with something simpler, like a 'fetch example'?",
];

pub const INSERT_FALLBACK: &str =
    "I'm sorry, I don't have a snippet for that yet. Try 'a hello world function' or 'a try catch block'.";

pub const EXPLAIN_PREAMBLE: &str = "Of course! Here is an explanation of the following code. This is a simulated explanation: I've identified it as a piece of code, and in the future I will be able to describe its functionality, structure, and potential improvements.";

/// Phrases asking what the code in view does.
pub const EXPLAIN_PHRASES: &[&str] = &["explain this", "what does this do"];

pub const SELECT_CODE_PROMPT: &str = "I'm not sure what you're referring to. Can you be more specific or select the code you want me to explain?";

/// A canned snippet offered for a keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snippet {
    pub keyword: &'static str,
    pub speech: &'static str,
    pub code: &'static str,
}

pub const GENERATE_SNIPPETS: &[Snippet] = &[
    Snippet {
        keyword: "hello world",
        speech: "Sure, here is a JavaScript function that returns \"Hello, World!\":",
        code: "function helloWorld() {\n  return \"Hello, World!\";\n}",
    },
    Snippet {
        keyword: "person class",
        speech: "Here is a simple 'Person' class:",
        code: "class Person {\n  constructor(name, age) {\n    this.name = name;\n    this.age = age;\n  }\n\n  greet() {\n    return `Hello, my name is ${this.name}.`;\n  }\n}",
    },
    Snippet {
        keyword: "fetch",
        speech: "Here's an example of using fetch to get data from an API:",
        code: "async function fetchData(url) {\n  try {\n    const response = await fetch(url);\n    if (!response.ok) {\n      throw new Error('Network response was not ok');\n    }\n    const data = await response.json();\n    return data;\n  } catch (error) {\n    console.error('There has been a problem with your fetch operation:', error);\n  }\n}",
    },
];

pub const INSERT_SNIPPETS: &[Snippet] = &[
    Snippet {
        keyword: "hello world",
        speech: "Here's a hello world function to insert:",
        code: "function helloWorld() {\n  console.log(\"Hello, World!\");\n}",
    },
    Snippet {
        keyword: "try catch",
        speech: "Here's a try/catch block to insert:",
        code: "try {\n  // code that may throw\n} catch (error) {\n  console.error(error);\n}",
    },
    Snippet {
        keyword: "for loop",
        speech: "Here's a for loop to insert:",
        code: "for (let i = 0; i < 10; i++) {\n  console.log(i);\n}",
    },
];

/// Ordered keyword to explanation table for general questions.
pub const KNOWLEDGE: &[(&str, &str)] = &[
    (
        "function",
        "A function is a reusable block of code designed to perform a particular task. Functions are executed when they are called. You can pass data, known as parameters, into a function.\n\nExample:\n`function add(a, b) {\n  return a + b;\n}`",
    ),
    (
        "variable",
        "A variable is a container for storing data. In JavaScript, `let` is used for variables that can be reassigned, while `const` is for variables that cannot.\n\nExample:\n`let score = 100;\nconst playerName = \"Jules\";`",
    ),
    (
        "loop",
        "Loops are used to repeatedly run a block of code. The `for` loop is common for a set number of iterations, while `while` loops run as long as a condition is true.\n\nExample (for loop):\n`for (let i = 0; i < 5; i++) {\n  console.log(\"Iteration \" + i);\n}`",
    ),
    (
        "if statement",
        "An `if` statement executes a block of code if a specified condition is true. You can use an `else` block to execute code if the condition is false.\n\nExample:\n`if (age >= 18) {\n  console.log(\"Adult\");\n} else {\n  console.log(\"Minor\");\n}`",
    ),
    (
        "class",
        "A class is a blueprint for creating objects. It encapsulates data and functions that work on that data.\n\nExample:\n`class Car {\n  constructor(brand) {\n    this.brand = brand;\n  }\n  present() {\n    return \"I have a \" + this.brand;\n  }\n}`",
    ),
    (
        "array",
        "An array is a special variable, which can hold more than one value at a time. Arrays are used to store lists of items.\n\nExample:\n`const fruits = [\"Apple\", \"Banana\", \"Cherry\"];`",
    ),
    (
        "object",
        "An object is a collection of key-value pairs. It's a common way to group related data.\n\nExample:\n`const person = { firstName: \"John\", lastName: \"Doe\", age: 50 };`",
    ),
    (
        "promise",
        "A Promise is an object representing the eventual completion or failure of an asynchronous operation. It allows you to handle async operations in a more synchronous-like fashion.\n\nExample:\n`const myPromise = new Promise((resolve, reject) => {\n  setTimeout(() => resolve(\"Success!\"), 1000);\n});`",
    ),
    (
        "async/await",
        "`async/await` is modern syntax for handling asynchronous operations. An `async` function returns a Promise, and `await` pauses the function execution until the Promise is settled.\n\nExample:\n`async function getData() {\n  const data = await somePromise;\n  console.log(data);\n}`",
    ),
];

/// First snippet whose keyword appears in `text` (already lowercased).
pub fn find_snippet(table: &'static [Snippet], text: &str) -> Option<&'static Snippet> {
    table.iter().find(|snippet| text.contains(snippet.keyword))
}

/// True if `text` (already lowercased) asks what the code in view does.
pub fn asks_for_explanation(text: &str) -> bool {
    EXPLAIN_PHRASES.iter().any(|phrase| text.contains(phrase))
}

/// First knowledge entry whose keyword appears in `text` (already lowercased).
pub fn find_knowledge(text: &str) -> Option<&'static str> {
    KNOWLEDGE
        .iter()
        .find(|(keyword, _)| text.contains(keyword))
        .map(|(_, explanation)| *explanation)
}
