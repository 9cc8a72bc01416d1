//! Built-in code snippets for the demo.

use serde::Serialize;

/// A named snippet with the problems it is meant to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Sample {
    /// Stable id used on the command line.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// What is wrong with the snippet.
    pub description: &'static str,
    /// File name the snippet is analyzed under.
    pub file_path: &'static str,
    /// Source text.
    pub code: &'static str,
}

/// Every built-in sample, in display order.
pub static SAMPLES: [Sample; 5] = [
    Sample {
        id: "react-component-issues",
        name: "React Component with Issues",
        description: "Missing keys, console.log, missing aria-labels",
        file_path: "TodoList.tsx",
        code: r#"import React from 'react';

function Button({ children, onClick }) {
  return (
    <button onClick={onClick} className="btn">
      {children}
    </button>
  );
}

function TodoList({ todos }) {
  return (
    <div>
      {todos.map(todo => (
        <div>
          <span>{todo.text}</span>
          <Button onClick={() => {
            console.log('Deleting todo', todo.id);
          }}>
            Delete
          </Button>
        </div>
      ))}
    </div>
  );
}
"#,
    },
    Sample {
        id: "nextjs-app-router",
        name: "Next.js App Router Component",
        description: "Missing use client directive, localStorage during SSR, legacy router import",
        file_path: "UserProfile.tsx",
        code: r#"import { useState, useEffect } from 'react';
import { useRouter } from 'next/router';

export default function UserProfile({ userId }) {
  const router = useRouter();
  const [user, setUser] = useState(null);
  const [loading, setLoading] = useState(true);
  const theme = localStorage.getItem('theme');

  useEffect(() => {
    fetch(`/api/users/${userId}`)
      .then(res => res.json())
      .then(data => {
        setUser(data);
        setLoading(false);
      });
  }, [userId]);

  if (loading) return <div>Loading...</div>;

  return (
    <div>
      <h1>{user.name}</h1>
      <p>{user.email}</p>
      <span>Theme: {theme}</span>
    </div>
  );
}
"#,
    },
    Sample {
        id: "hydration-errors",
        name: "Hydration Error Component",
        description: "Direct window.localStorage access causing hydration mismatch",
        file_path: "ThemeProvider.tsx",
        code: r#"export default function ThemeProvider() {
  const [theme, setTheme] = React.useState('light');
  const storedTheme = window.localStorage.getItem('theme') || 'light';

  return (
    <div className={`theme-${storedTheme}`}>
      <h1>Current theme: {storedTheme}</h1>
      <button onClick={() => {
        const newTheme = theme === 'light' ? 'dark' : 'light';
        setTheme(newTheme);
        window.localStorage.setItem('theme', newTheme);
      }}>
        Toggle Theme
      </button>
    </div>
  );
}
"#,
    },
    Sample {
        id: "pattern-layer",
        name: "Pattern Layer Issues",
        description: "HTML entities, var declarations, leftover console output",
        file_path: "users.js",
        code: r#"var userCount = 0;
var activeUsers = [];

function printMessage() {
  var message = "Welcome to &quot;NeuroLint&quot;";
  console.log(message);
  alert('User count: ' + userCount);
}

function getUser(id) {
  var found = false;
  for (var i = 0; i < activeUsers.length; i++) {
    if (activeUsers[i].id === id) {
      found = true;
      break;
    }
  }
  return found;
}
"#,
    },
    Sample {
        id: "accessibility-layer",
        name: "Accessibility Issues",
        description: "Icon-only buttons without aria-labels",
        file_path: "Navigation.tsx",
        code: r#"function Button({ icon, onClick }) {
  return (
    <button onClick={onClick}>
      <svg>{icon}</svg>
    </button>
  );
}

function Navigation() {
  return (
    <nav>
      <button onClick={() => alert('Search')}>?</button>
      <button onClick={() => alert('Menu')}>=</button>
    </nav>
  );
}
"#,
    },
];

/// Look up a sample by id.
pub fn find_sample(id: &str) -> Option<&'static Sample> {
    SAMPLES.iter().find(|sample| sample.id == id)
}

/// The sample shown when none is chosen.
pub fn default_sample() -> &'static Sample {
    &SAMPLES[0]
}
