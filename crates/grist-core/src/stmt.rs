mod condition;
pub use condition::{Condition, Group, JoinKind, JoinSpec, Operand};

mod literal;
pub use literal::{Literal, LiteralKind, LiteralOperand};

mod op;
pub use op::{Connector, Op, Quantifier};

mod order;
pub use order::{Direction, OrderClause, OrderEntry, OrderExpr, OrderMode};

mod projection;
pub use projection::{Projection, ProjectionItem, ProjectionMode};

mod query;
pub use query::{IntoFieldRef, Operation, Query};

mod value;
pub use value::Value;
