//! Static built-in function and keyword catalogs for completions.
//!
//! Generated: 2026-07-21T18:02:33Z
//!
//! DO NOT EDIT - regenerate with:
//!   cd scripts/codegen && go run . -ref ../../docs/function-reference.json -out ../../src/catalog/builtins.rs

use super::symbol::{Symbol, SymbolKind};

/// A parameter of a built-in function.
#[derive(Debug, Clone)]
pub struct BuiltinParam {
    pub name: &'static str,
    pub description: &'static str,
}

/// A built-in function definition.
#[derive(Debug, Clone)]
pub struct BuiltinFunction {
    pub name: &'static str,
    pub description: &'static str,
    pub params: &'static [BuiltinParam],
    pub category: &'static str,
}

/// A built-in keyword definition.
#[derive(Debug, Clone)]
pub struct BuiltinKeyword {
    pub name: &'static str,
    pub description: &'static str,
}

impl BuiltinFunction {
    /// Render the call signature, e.g. `SUM(column)`.
    pub fn signature(&self) -> String {
        let params: Vec<&str> = self.params.iter().map(|p| p.name).collect();
        format!("{}({})", self.name, params.join(", "))
    }

    /// Convert to a completion symbol.
    pub fn to_symbol(&self) -> Symbol {
        Symbol {
            name: self.name.to_string(),
            display_text: self.signature(),
            description: self.description.to_string(),
            kind: SymbolKind::Function,
            parent_table: None,
        }
    }
}

impl BuiltinKeyword {
    /// Convert to a completion symbol.
    pub fn to_symbol(&self) -> Symbol {
        Symbol::builtin(self.name, self.description, SymbolKind::Keyword)
    }
}

/// Look up a built-in function by name.
pub fn find_function(name: &str) -> Option<&'static BuiltinFunction> {
    FUNCTIONS.iter().find(|f| f.name == name)
}

/// Look up a built-in keyword by name.
pub fn find_keyword(name: &str) -> Option<&'static BuiltinKeyword> {
    KEYWORDS.iter().find(|k| k.name == name)
}

/// All built-in symbols (functions then keywords) as completion candidates.
pub fn builtin_symbols() -> Vec<Symbol> {
    FUNCTIONS
        .iter()
        .map(BuiltinFunction::to_symbol)
        .chain(KEYWORDS.iter().map(BuiltinKeyword::to_symbol))
        .collect()
}

/// All built-in functions.
pub static FUNCTIONS: &[BuiltinFunction] = &[
    BuiltinFunction {
        name: "ABS",
        description: "Returns the absolute value of a number.",
        params: &[BuiltinParam {
            name: "number",
            description: "The number for which you want the absolute value.",
        }],
        category: "math",
    },
    BuiltinFunction {
        name: "ALL",
        description: "Returns all the rows in a table, or all the values in a column, ignoring any filters that might have been applied.",
        params: &[BuiltinParam {
            name: "table_or_column",
            description: "The table or column to clear filters from.",
        }],
        category: "filter",
    },
    BuiltinFunction {
        name: "ALLEXCEPT",
        description: "Removes all context filters in the table except filters that have been applied to the specified columns.",
        params: &[
            BuiltinParam {
                name: "table",
                description: "The table to clear filters from.",
            },
            BuiltinParam {
                name: "column",
                description: "A column whose filters are kept.",
            },
        ],
        category: "filter",
    },
    BuiltinFunction {
        name: "AVERAGE",
        description: "Returns the average (arithmetic mean) of all the numbers in a column.",
        params: &[BuiltinParam {
            name: "column",
            description: "The column that contains the numbers to average.",
        }],
        category: "aggregation",
    },
    BuiltinFunction {
        name: "AVERAGEX",
        description: "Calculates the average of an expression evaluated over a table.",
        params: &[
            BuiltinParam {
                name: "table",
                description: "The table over which the expression is evaluated.",
            },
            BuiltinParam {
                name: "expression",
                description: "The expression to evaluate for each row.",
            },
        ],
        category: "aggregation",
    },
    BuiltinFunction {
        name: "BLANK",
        description: "Returns a blank.",
        params: &[],
        category: "text",
    },
    BuiltinFunction {
        name: "CALCULATE",
        description: "Evaluates an expression in a context modified by the specified filters.",
        params: &[
            BuiltinParam {
                name: "expression",
                description: "The expression to be evaluated.",
            },
            BuiltinParam {
                name: "filter",
                description: "A boolean expression or table expression that defines a filter.",
            },
        ],
        category: "filter",
    },
    BuiltinFunction {
        name: "CALCULATETABLE",
        description: "Evaluates a table expression in a context modified by the specified filters.",
        params: &[
            BuiltinParam {
                name: "expression",
                description: "The table expression to be evaluated.",
            },
            BuiltinParam {
                name: "filter",
                description: "A boolean expression or table expression that defines a filter.",
            },
        ],
        category: "filter",
    },
    BuiltinFunction {
        name: "CONCATENATE",
        description: "Joins two text strings into one text string.",
        params: &[
            BuiltinParam {
                name: "text1",
                description: "The first text string.",
            },
            BuiltinParam {
                name: "text2",
                description: "The second text string.",
            },
        ],
        category: "text",
    },
    BuiltinFunction {
        name: "COUNT",
        description: "Counts the number of cells in a column that contain numbers.",
        params: &[BuiltinParam {
            name: "column",
            description: "The column that contains the values to count.",
        }],
        category: "aggregation",
    },
    BuiltinFunction {
        name: "COUNTBLANK",
        description: "Counts the number of blank cells in a column.",
        params: &[BuiltinParam {
            name: "column",
            description: "The column that contains the blank cells to count.",
        }],
        category: "aggregation",
    },
    BuiltinFunction {
        name: "COUNTROWS",
        description: "Counts the number of rows in the specified table, or in a table defined by an expression.",
        params: &[BuiltinParam {
            name: "table",
            description: "The table whose rows are counted.",
        }],
        category: "aggregation",
    },
    BuiltinFunction {
        name: "DATE",
        description: "Returns the specified date in datetime format.",
        params: &[
            BuiltinParam {
                name: "year",
                description: "A number representing the year.",
            },
            BuiltinParam {
                name: "month",
                description: "A number representing the month.",
            },
            BuiltinParam {
                name: "day",
                description: "A number representing the day.",
            },
        ],
        category: "date_time",
    },
    BuiltinFunction {
        name: "DATEADD",
        description: "Returns a table that contains a column of dates, shifted either forward or backward in time by the specified number of intervals.",
        params: &[
            BuiltinParam {
                name: "dates",
                description: "A column that contains dates.",
            },
            BuiltinParam {
                name: "number_of_intervals",
                description: "An integer that specifies the number of intervals to shift.",
            },
            BuiltinParam {
                name: "interval",
                description: "The interval: year, quarter, month, or day.",
            },
        ],
        category: "time_intel",
    },
    BuiltinFunction {
        name: "DATESBETWEEN",
        description: "Returns a table that contains a column of dates that begins with the start date and continues until the end date.",
        params: &[
            BuiltinParam {
                name: "dates",
                description: "A column that contains dates.",
            },
            BuiltinParam {
                name: "start_date",
                description: "The first date in the range.",
            },
            BuiltinParam {
                name: "end_date",
                description: "The last date in the range.",
            },
        ],
        category: "time_intel",
    },
    BuiltinFunction {
        name: "DISTINCT",
        description: "Returns a one-column table that contains the distinct values from the specified column.",
        params: &[BuiltinParam {
            name: "column",
            description: "The column from which unique values are returned.",
        }],
        category: "filter",
    },
    BuiltinFunction {
        name: "DISTINCTCOUNT",
        description: "Counts the number of distinct values in a column.",
        params: &[BuiltinParam {
            name: "column",
            description: "The column that contains the values to count.",
        }],
        category: "aggregation",
    },
    BuiltinFunction {
        name: "DIVIDE",
        description: "Performs division and returns an alternate result or BLANK() on division by zero.",
        params: &[
            BuiltinParam {
                name: "numerator",
                description: "The dividend.",
            },
            BuiltinParam {
                name: "denominator",
                description: "The divisor.",
            },
            BuiltinParam {
                name: "alternate_result",
                description: "The value returned when division by zero occurs. Optional.",
            },
        ],
        category: "math",
    },
    BuiltinFunction {
        name: "EARLIER",
        description: "Returns the current value of the specified column in an outer evaluation pass of the column.",
        params: &[
            BuiltinParam {
                name: "column",
                description: "The column that contains the desired value.",
            },
            BuiltinParam {
                name: "number",
                description: "How many outer passes to go back. Optional, default one.",
            },
        ],
        category: "filter",
    },
    BuiltinFunction {
        name: "FILTER",
        description: "Returns a table that represents a subset of another table or expression.",
        params: &[
            BuiltinParam {
                name: "table",
                description: "The table to be filtered.",
            },
            BuiltinParam {
                name: "filter",
                description: "A boolean expression evaluated for each row.",
            },
        ],
        category: "filter",
    },
    BuiltinFunction {
        name: "FIRSTDATE",
        description: "Returns the first date in the current context for the specified column of dates.",
        params: &[BuiltinParam {
            name: "dates",
            description: "A column that contains dates.",
        }],
        category: "time_intel",
    },
    BuiltinFunction {
        name: "FORMAT",
        description: "Converts a value to text according to the specified format.",
        params: &[
            BuiltinParam {
                name: "value",
                description: "The value to convert.",
            },
            BuiltinParam {
                name: "format_string",
                description: "The formatting template to apply.",
            },
        ],
        category: "text",
    },
    BuiltinFunction {
        name: "IF",
        description: "Checks if a condition is met, and returns one value if true and another value if false.",
        params: &[
            BuiltinParam {
                name: "logical_test",
                description: "Any expression that can be evaluated to true or false.",
            },
            BuiltinParam {
                name: "value_if_true",
                description: "The value returned if the test is true.",
            },
            BuiltinParam {
                name: "value_if_false",
                description: "The value returned if the test is false. Optional.",
            },
        ],
        category: "logical",
    },
    BuiltinFunction {
        name: "ISBLANK",
        description: "Checks whether a value is blank, and returns TRUE or FALSE.",
        params: &[BuiltinParam {
            name: "value",
            description: "The value to test.",
        }],
        category: "information",
    },
    BuiltinFunction {
        name: "LASTDATE",
        description: "Returns the last date in the current context for the specified column of dates.",
        params: &[BuiltinParam {
            name: "dates",
            description: "A column that contains dates.",
        }],
        category: "time_intel",
    },
    BuiltinFunction {
        name: "LOOKUPVALUE",
        description: "Returns the value in the result column for the row that meets all criteria specified by the search columns.",
        params: &[
            BuiltinParam {
                name: "result_column",
                description: "The column that contains the value to return.",
            },
            BuiltinParam {
                name: "search_column",
                description: "The column to search.",
            },
            BuiltinParam {
                name: "search_value",
                description: "The value to find in the search column.",
            },
        ],
        category: "filter",
    },
    BuiltinFunction {
        name: "MAX",
        description: "Returns the largest numeric value in a column.",
        params: &[BuiltinParam {
            name: "column",
            description: "The column in which to find the largest value.",
        }],
        category: "aggregation",
    },
    BuiltinFunction {
        name: "MIN",
        description: "Returns the smallest numeric value in a column.",
        params: &[BuiltinParam {
            name: "column",
            description: "The column in which to find the smallest value.",
        }],
        category: "aggregation",
    },
    BuiltinFunction {
        name: "RELATED",
        description: "Returns a related value from another table.",
        params: &[BuiltinParam {
            name: "column",
            description: "The column that contains the value to retrieve.",
        }],
        category: "filter",
    },
    BuiltinFunction {
        name: "RELATEDTABLE",
        description: "Returns a table of rows related to the current row.",
        params: &[BuiltinParam {
            name: "table",
            description: "The table from which related rows are returned.",
        }],
        category: "filter",
    },
    BuiltinFunction {
        name: "ROUND",
        description: "Rounds a number to the specified number of digits.",
        params: &[
            BuiltinParam {
                name: "number",
                description: "The number to round.",
            },
            BuiltinParam {
                name: "num_digits",
                description: "The number of digits to round to.",
            },
        ],
        category: "math",
    },
    BuiltinFunction {
        name: "SAMEPERIODLASTYEAR",
        description: "Returns a table that contains a column of dates shifted one year back in time from the dates in the current context.",
        params: &[BuiltinParam {
            name: "dates",
            description: "A column that contains dates.",
        }],
        category: "time_intel",
    },
    BuiltinFunction {
        name: "SUM",
        description: "Adds all the numbers in a column.",
        params: &[BuiltinParam {
            name: "column",
            description: "The column that contains the numbers to sum.",
        }],
        category: "aggregation",
    },
    BuiltinFunction {
        name: "SUMX",
        description: "Returns the sum of an expression evaluated for each row in a table.",
        params: &[
            BuiltinParam {
                name: "table",
                description: "The table over which the expression is evaluated.",
            },
            BuiltinParam {
                name: "expression",
                description: "The expression to evaluate for each row.",
            },
        ],
        category: "aggregation",
    },
    BuiltinFunction {
        name: "SWITCH",
        description: "Evaluates an expression against a list of values and returns the result corresponding to the first matching value.",
        params: &[
            BuiltinParam {
                name: "expression",
                description: "The expression to evaluate.",
            },
            BuiltinParam {
                name: "value",
                description: "A value to match against.",
            },
            BuiltinParam {
                name: "result",
                description: "The result returned when the value matches.",
            },
        ],
        category: "logical",
    },
    BuiltinFunction {
        name: "TOTALYTD",
        description: "Evaluates the year-to-date value of an expression in the current context.",
        params: &[
            BuiltinParam {
                name: "expression",
                description: "The expression to evaluate.",
            },
            BuiltinParam {
                name: "dates",
                description: "A column that contains dates.",
            },
        ],
        category: "time_intel",
    },
    BuiltinFunction {
        name: "VALUES",
        description: "Returns a one-column table that contains the distinct values from the specified column, including a blank row for unmatched rows.",
        params: &[BuiltinParam {
            name: "column",
            description: "The column from which unique values are returned.",
        }],
        category: "filter",
    },
];

/// All built-in keywords.
pub static KEYWORDS: &[BuiltinKeyword] = &[
    BuiltinKeyword {
        name: "ASC",
        description: "Ascending sort direction in an ORDER BY clause.",
    },
    BuiltinKeyword {
        name: "DEFINE",
        description: "Begins a definition block of measures, variables, tables, or columns scoped to the query.",
    },
    BuiltinKeyword {
        name: "DESC",
        description: "Descending sort direction in an ORDER BY clause.",
    },
    BuiltinKeyword {
        name: "EVALUATE",
        description: "Introduces a table expression to be evaluated and returned as a query result.",
    },
    BuiltinKeyword {
        name: "FALSE",
        description: "The boolean literal false.",
    },
    BuiltinKeyword {
        name: "MEASURE",
        description: "Defines a query-scoped measure inside a DEFINE block.",
    },
    BuiltinKeyword {
        name: "NOT",
        description: "Logical negation operator.",
    },
    BuiltinKeyword {
        name: "ORDER BY",
        description: "Sorts the rows of the query result by one or more expressions.",
    },
    BuiltinKeyword {
        name: "RETURN",
        description: "Introduces the result expression following VAR definitions.",
    },
    BuiltinKeyword {
        name: "START AT",
        description: "Specifies the starting values for an ORDER BY clause.",
    },
    BuiltinKeyword {
        name: "TRUE",
        description: "The boolean literal true.",
    },
    BuiltinKeyword {
        name: "VAR",
        description: "Declares a variable whose value is computed once and reusable in the expression.",
    },
];
