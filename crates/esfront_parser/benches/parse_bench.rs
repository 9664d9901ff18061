use criterion::{black_box, criterion_group, criterion_main, Criterion};
use esfront_parser::{parse, ParseOptions, Plugin};

// A medium-size module mixing ES2015+ syntax, Flow annotations and JSX
const MODULE_SOURCE: &str = r#"
// @flow
import React from "react";
import type { Store } from "./store";

type User = {
  id: number,
  name: string,
  email?: string,
};

type Filter = (user: User) => boolean;

export class UserList extends React.Component<void, Props, State> {
  state: State;
  static defaultProps = { users: [] };

  constructor(props: Props) {
    super(props);
    this.state = { selected: null };
  }

  select(id: number): void {
    this.setState({ selected: id });
  }

  render() {
    const { users } = this.props;
    return (
      <ul className="users">
        {users.map((user) => (
          <li key={user.id} onClick={() => this.select(user.id)}>
            {user.name} &mdash; {user.email || "n/a"}
          </li>
        ))}
      </ul>
    );
  }
}

export async function load(store: Store, filter: Filter): Promise<Array<User>> {
  const all = await store.fetch(`/users?limit=${100}`);
  return all.filter(filter).sort((a, b) => a.id - b.id);
}

function* ids(users: Array<User>): Iterator<number> {
  for (const { id } of users) {
    yield id;
  }
}

export default function summarize(users: Array<User>): string {
  let count = 0;
  for (let i = 0; i < users.length; i++) {
    if (users[i].email != null) count += 1;
  }
  return [...ids(users)].join(",") + " (" + count + ")";
}
"#;

fn bench_parse_module(c: &mut Criterion) {
    let options = ParseOptions::module().with_plugin(Plugin::Flow).with_plugin(Plugin::Jsx);
    c.bench_function("parse_module_medium", |b| {
        b.iter(|| {
            let file = parse(black_box(MODULE_SOURCE), &options);
            black_box(file)
        });
    });
}

criterion_group!(benches, bench_parse_module);
criterion_main!(benches);
